//! SVG serialization of a [`Drawing`].
//!
//! Coordinates and radii are written as truncated integers, label
//! positions and font sizes with two decimals. Lines end in CRLF.

use crate::render::{Drawing, Primitive};
use std::fmt::Write;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\r\n\
<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\r\n\
\t\"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\r\n";

/// Escape the five XML special characters for element text and attributes.
pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn int(value: f64) -> i64 {
    value.trunc() as i64
}

pub fn to_svg(drawing: &Drawing) -> String {
    let mut out = String::from(HEADER);
    let _ = write!(
        out,
        "<svg width=\"{}\" height=\"{}\" transform=\"scale(1 1) rotate(0) translate(0 0)\" \
         xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\r\n",
        int(drawing.width),
        int(drawing.height)
    );

    for primitive in &drawing.primitives {
        write_primitive(&mut out, primitive);
    }

    out.push_str("</svg>\r\n");
    out
}

fn write_primitive(out: &mut String, primitive: &Primitive) {
    let id = primitive.id();
    match primitive {
        Primitive::Node {
            label,
            cx,
            cy,
            rx,
            ry,
            font_size,
            fill,
            ..
        } => {
            let label = xml_escape(label);
            let _ = write!(
                out,
                "<g id=\"{id}\" class=\"node\"><title>{label}</title>\
                 <ellipse fill=\"{fill}\" stroke=\"#000\" cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" />\
                 <text text-anchor=\"middle\" x=\"{:.2}\" y=\"{:.2}\" \
                 font-family=\"Times New Roman,serif\" font-size=\"{:.2}\">{label}</text></g>\r\n",
                int(*cx),
                int(*cy),
                int(*rx),
                int(*ry),
                cx,
                cy,
                font_size
            );
        }
        Primitive::Waypoint {
            cx, cy, r, fill, ..
        } => {
            let _ = write!(
                out,
                "<g id=\"{id}\" class=\"edge\"><ellipse fill=\"{fill}\" stroke=\"#ccc\" \
                 cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" /></g>\r\n",
                int(*cx),
                int(*cy),
                int(*r),
                int(*r)
            );
        }
        Primitive::Link {
            x1,
            y1,
            x2,
            y2,
            stroke,
            ..
        } => {
            let _ = write!(
                out,
                "<g id=\"{id}\" class=\"link\"><line stroke=\"{stroke}\" \
                 x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" /></g>\r\n",
                int(*x1),
                int(*y1),
                int(*x2),
                int(*y2)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("A & B <C>"), "A &amp; B &lt;C&gt;");
        assert_eq!(xml_escape("it's"), "it&apos;s");
    }

    #[test]
    fn test_empty_drawing() {
        let svg = to_svg(&Drawing {
            width: 250.9,
            height: 300.0,
            primitives: Vec::new(),
        });
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("width=\"250\" height=\"300\""));
        assert!(svg.ends_with("</svg>\r\n"));
    }
}
