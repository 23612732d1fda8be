use chrono::NaiveDate;

/// `$1,234.56`, with a leading minus for negative values.
pub fn format_currency(value: f64) -> String {
    format_money(value, 2)
}

/// Whole-dollar variant used for chart values, e.g. `$1,235`.
pub fn format_currency_whole(value: f64) -> String {
    format_money(value, 0)
}

/// `Jan 05, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn format_money(value: f64, decimals: usize) -> String {
    let digits = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Values that round to zero print without a sign.
    let sign = if value < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}
