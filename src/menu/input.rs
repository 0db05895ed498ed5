use std::io::{self, BufRead, Write};

/// Print a prompt and read one line. `None` means the input stream ended,
/// which the menu treats as a graceful exit.
pub fn prompt_line<R, W>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// The menu's numeric-choice reader: retries forever on non-integer input,
/// never failing back to the caller. Only EOF breaks the loop.
pub fn read_choice<R, W>(input: &mut R, out: &mut W) -> io::Result<Option<i32>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let line = match prompt_line(input, out, "Please make your choice: ")? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.parse::<i32>() {
            Ok(choice) => return Ok(Some(choice)),
            Err(_) => writeln!(out, "Your input is invalid!")?,
        }
    }
}

/// Parse a decimal money amount ("9.99", "12", "0.5") into integer cents.
pub fn parse_price_cents(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('-') {
        return None;
    }

    let (dollars, cents) = match text.split_once('.') {
        Some((d, c)) => (d, c),
        None => (text, ""),
    };

    let dollars: i64 = if dollars.is_empty() {
        0
    } else {
        dollars.parse().ok()?
    };

    // `parse` alone would accept a sign inside the cents part ("9.-5").
    if !cents.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let cents: i64 = match cents.len() {
        0 => 0,
        1 => cents.parse::<i64>().ok()? * 10,
        2 => cents.parse().ok()?,
        _ => return None,
    };

    dollars.checked_mul(100)?.checked_add(cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn choice_reader_retries_until_integer() {
        let mut input = Cursor::new("abc\n\n7\n");
        let mut out = Vec::new();
        let choice = read_choice(&mut input, &mut out).unwrap();
        assert_eq!(choice, Some(7));

        let rendered = String::from_utf8(out).unwrap();
        assert_eq!(rendered.matches("Your input is invalid!").count(), 2);
    }

    #[test]
    fn choice_reader_stops_on_eof() {
        let mut input = Cursor::new("not-a-number\n");
        let mut out = Vec::new();
        assert_eq!(read_choice(&mut input, &mut out).unwrap(), None);
    }

    #[test]
    fn prompt_line_trims_and_detects_eof() {
        let mut input = Cursor::new("  alice  \n");
        let mut out = Vec::new();
        let line = prompt_line(&mut input, &mut out, "> ").unwrap();
        assert_eq!(line.as_deref(), Some("alice"));
        assert_eq!(prompt_line(&mut input, &mut out, "> ").unwrap(), None);
    }

    #[test]
    fn price_parsing() {
        assert_eq!(parse_price_cents("9.99"), Some(999));
        assert_eq!(parse_price_cents("12"), Some(1200));
        assert_eq!(parse_price_cents("0.5"), Some(50));
        assert_eq!(parse_price_cents(".75"), Some(75));
        assert_eq!(parse_price_cents("-1"), None);
        assert_eq!(parse_price_cents("9.-5"), None);
        assert_eq!(parse_price_cents("9.+5"), None);
        assert_eq!(parse_price_cents("1.999"), None);
        assert_eq!(parse_price_cents("abc"), None);
        assert_eq!(parse_price_cents(""), None);
    }
}
