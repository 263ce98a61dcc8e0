/// "R$ 1.415" style price, dot-grouped thousands, no cents. Prices in
/// this app are whole reais.
pub fn format_brl(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("R$ {grouped}")
}

/// Askama filter wrapper, `{{ price|money }}`.
pub fn money(value: &u32) -> askama::Result<String> {
    Ok(format_brl(*value))
}

/// Up to two uppercase initials for avatar circles, `{{ name|initials }}`.
pub fn initials(name: &str) -> askama::Result<String> {
    Ok(name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase())
}
