//! # Calculadora
//! src/handlers/calc.rs

use crate::http::Response;
use crate::router::HandlerContext;

/// Handler para /calc?a=N&b=M
///
/// Suma dos enteros. Un parámetro ausente o que no es entero vale 0; la
/// suma se calcula en `i128`, así no hay overflow posible.
///
/// # Ejemplo de response
/// ```text
/// <html><body><h1>Calculation Result</h1><p>3 + 4 = 7</p></body></html>
/// ```
pub fn calc_handler(_ctx: &HandlerContext<'_>, remainder: &str) -> Response {
    let (a, b) = parse_operands(remainder);
    let sum = i128::from(a) + i128::from(b);

    let body = format!(
        "<html><body>\
         <h1>Calculation Result</h1>\
         <p>{} + {} = {}</p>\
         </body></html>",
        a, b, sum
    );

    Response::html(&body)
}

/// Extrae `a` y `b` del resto del path (`?a=3&b=4`)
pub fn parse_operands(remainder: &str) -> (i64, i64) {
    let query = remainder.strip_prefix('?').unwrap_or(remainder);
    (param(query, "a"), param(query, "b"))
}

/// Primer valor de `name` en la query, 0 si falta o no parsea
fn param(query: &str, name: &str) -> i64 {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ServerCounters;
    use std::path::Path;

    #[test]
    fn test_parse_operands() {
        assert_eq!(parse_operands("?a=3&b=4"), (3, 4));
        assert_eq!(parse_operands("?b=4&a=-3"), (-3, 4));
        assert_eq!(parse_operands("?a=10"), (10, 0));
        assert_eq!(parse_operands(""), (0, 0));
        assert_eq!(parse_operands("?a=x&b=2"), (0, 2));
        assert_eq!(parse_operands("?a=1&a=9&b=1"), (1, 1));
    }

    #[test]
    fn test_calc_renders_sum() {
        let counters = ServerCounters::new();
        let ctx = HandlerContext {
            counters: &counters,
            static_root: Path::new("static"),
        };

        let text = String::from_utf8(calc_handler(&ctx, "?a=3&b=4").to_bytes().unwrap()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n"));
        assert!(text.contains("<p>3 + 4 = 7</p>"));
    }

    #[test]
    fn test_calc_does_not_overflow() {
        let counters = ServerCounters::new();
        let ctx = HandlerContext {
            counters: &counters,
            static_root: Path::new("static"),
        };

        let remainder = format!("?a={}&b={}", i64::MAX, i64::MAX);
        let text = String::from_utf8(calc_handler(&ctx, &remainder).to_bytes().unwrap()).unwrap();
        assert!(text.contains(&format!("= {}</p>", i128::from(i64::MAX) * 2)));
    }
}
