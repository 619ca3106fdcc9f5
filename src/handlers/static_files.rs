//! # Archivos Estáticos
//! src/handlers/static_files.rs
//!
//! Resuelve el resto del path bajo la raíz estática y transmite el archivo
//! como `application/octet-stream`. Cualquier componente que no sea un
//! nombre normal (`..`, prefijos de disco) se rechaza con el mismo 404 que
//! un archivo inexistente, así el cliente no distingue entre ambos casos.

use crate::http::Response;
use crate::router::HandlerContext;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Handler para /static/<archivo>
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK\r\n
/// Content-Type: application/octet-stream\r\n
/// \r\n
/// <bytes del archivo>
/// ```
pub fn static_handler(ctx: &HandlerContext<'_>, remainder: &str) -> Response {
    let Some(path) = resolve(ctx.static_root, remainder) else {
        tracing::warn!(path = remainder, "Path estático rechazado");
        return Response::not_found();
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Archivo no encontrado");
            return Response::not_found();
        }
    };

    // Un directorio también abre en Unix; solo se sirven archivos regulares
    match file.metadata() {
        Ok(metadata) if metadata.is_file() => Response::file(file),
        _ => Response::not_found(),
    }
}

/// Construye la ruta final dentro de `root`
///
/// Retorna `None` si el path intenta salir de la raíz o no nombra nada.
/// La query (`?v=1`) no forma parte del nombre del archivo.
pub fn resolve(root: &Path, remainder: &str) -> Option<PathBuf> {
    let relative = remainder.split('?').next().unwrap_or_default();

    let mut resolved = root.to_path_buf();
    let mut named = false;

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                named = true;
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }

    named.then_some(resolved)
}
