/// Coerces a possibly missing or malformed amount to a non-negative number.
pub fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Rounds half up, matching how amounts are shown to users (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Formats a number with Indian digit grouping (`12,34,567.5`).
///
/// At most two fraction digits are kept and trailing zeros dropped.
pub fn format_en_in(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let grouped = if whole.len() <= 3 {
        whole
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let mut out = if negative { format!("-{grouped}") } else { grouped };
    if fraction != 0 {
        let digits = format!("{fraction:02}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Formats a rupee amount for the en-IN locale (`₹1,50,000`).
pub fn format_inr(value: f64) -> String {
    format!("₹{}", format_en_in(value))
}
