use std::io::{self, Write};

use crate::models::{Game, OrderLine, RentalOrder, TrackingRecord, UserProfile};

/// A record that can be rendered as one line of a tab-separated result set.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// Render a result set: one tab-separated header row, then one line per
/// record. Nothing is printed for an empty set; the row count lets callers
/// decide on a "no rows" notice.
pub fn print_table<W, T>(out: &mut W, rows: &[T]) -> io::Result<usize>
where
    W: Write,
    T: TableRow,
{
    if rows.is_empty() {
        return Ok(0);
    }

    writeln!(out, "{}", T::headers().join("\t"))?;
    for record in rows {
        writeln!(out, "{}", record.row().join("\t"))?;
    }
    Ok(rows.len())
}

/// Integer cents formatted as a dollars.cents amount.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn format_ts(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

impl TableRow for UserProfile {
    fn headers() -> &'static [&'static str] {
        &[
            "login",
            "phone_number",
            "role",
            "fav_games",
            "num_overdue_games",
            "created_at",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.login.clone(),
            self.phone_number.clone(),
            self.role.clone(),
            self.fav_games.clone(),
            self.num_overdue_games.to_string(),
            format_ts(self.created_at),
        ]
    }
}

impl TableRow for Game {
    fn headers() -> &'static [&'static str] {
        &["game_id", "game_name", "genre", "price", "description", "image_url"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.game_id.clone(),
            self.game_name.clone(),
            self.genre.clone(),
            format_cents(self.price),
            self.description.clone(),
            self.image_url.clone(),
        ]
    }
}

impl TableRow for RentalOrder {
    fn headers() -> &'static [&'static str] {
        &[
            "order_id",
            "login",
            "no_of_games",
            "total_price",
            "order_timestamp",
            "due_date",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.no_of_games.to_string(),
            format_cents(self.total_price),
            format_ts(self.order_timestamp),
            format_ts(self.due_date),
        ]
    }
}

impl TableRow for OrderLine {
    fn headers() -> &'static [&'static str] {
        &["line_id", "order_id", "game_id", "units_ordered"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.rental_order_id.to_string(),
            self.game_id.clone(),
            self.units_ordered.to_string(),
        ]
    }
}

impl TableRow for TrackingRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "tracking_id",
            "order_id",
            "status",
            "current_location",
            "courier_name",
            "last_update_date",
            "additional_comments",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.rental_order_id.to_string(),
            self.status.clone(),
            self.current_location.clone(),
            self.courier_name.clone(),
            format_ts(self.last_update_date),
            self.additional_comments.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting() {
        assert_eq!(format_cents(1998), "19.98");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1250), "-12.50");
    }

    #[test]
    fn table_prints_header_once_and_counts_rows() {
        let games = vec![
            Game {
                game_id: "G1".into(),
                game_name: "Chess".into(),
                genre: "strategy".into(),
                price: 999,
                description: "classic".into(),
                image_url: String::new(),
            },
            Game {
                game_id: "G2".into(),
                game_name: "Go".into(),
                genre: "strategy".into(),
                price: 1250,
                description: String::new(),
                image_url: String::new(),
            },
        ];

        let mut out = Vec::new();
        let count = print_table(&mut out, &games).unwrap();
        assert_eq!(count, 2);

        let rendered = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("game_id\tgame_name"));
        assert!(lines[1].contains("9.99"));
    }

    #[test]
    fn empty_table_prints_nothing() {
        let mut out = Vec::new();
        let count = print_table::<_, Game>(&mut out, &[]).unwrap();
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }
}
