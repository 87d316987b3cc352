//! Display helpers for amounts.

/// Format an amount as Indian rupees with Indian digit grouping.
///
/// The last three digits form one group and every two digits before that
/// form another, so 150000 becomes `₹1,50,000`.
#[must_use]
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("₹{},{tail}", groups.join(","))
}

/// Format a percentage with one decimal place.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}
