//! Number formatting for SVG attributes.
//!
//! Uses JS `Number.prototype.toString()` rules (shortest round-trip, no trailing `.0`) so path
//! data reads the same as browser-generated markup.

pub(crate) fn push_num(out: &mut String, mut v: f64, buf: &mut ryu_js::Buffer) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    if v == 0.0 {
        v = 0.0;
    }
    out.push_str(buf.format_finite(v));
}

#[cfg(test)]
mod tests {
    use super::push_num;

    fn num(v: f64) -> String {
        let mut out = String::new();
        push_num(&mut out, v, &mut ryu_js::Buffer::new());
        out
    }

    #[test]
    fn formats_like_js() {
        assert_eq!(num(60.0), "60");
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn appends_to_existing_output() {
        let mut out = String::from("M");
        let mut buf = ryu_js::Buffer::new();
        push_num(&mut out, 1.5, &mut buf);
        out.push(' ');
        push_num(&mut out, f64::INFINITY, &mut buf);
        assert_eq!(out, "M1.5 0");
    }
}
