//! Display formatting for people and addresses.

/// "Last First Middle", skipping blank parts and trimming the rest.
pub fn full_name(last_name: &str, first_name: &str, middle_name: Option<&str>) -> String {
    [Some(last_name), Some(first_name), middle_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "<street>, д. <number>"; falls back to whichever part is present.
pub fn address(street: Option<&str>, number: &str) -> String {
    let street = street.unwrap_or_default();
    if street.trim().is_empty() {
        return number.to_string();
    }
    if number.trim().is_empty() {
        return street.to_string();
    }
    format!("{}, д. {}", street, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_blank_parts() {
        assert_eq!(full_name(" Ivanov ", "Ivan", None), "Ivanov Ivan");
        assert_eq!(full_name("Ivanov", "  ", Some("Petrovich")), "Ivanov Petrovich");
        assert_eq!(full_name("", "", Some("")), "");
    }

    #[test]
    fn test_address_variants() {
        assert_eq!(address(Some("Lenina"), "12a"), "Lenina, д. 12a");
        assert_eq!(address(Some("Lenina"), " "), "Lenina");
        assert_eq!(address(None, "7"), "7");
        assert_eq!(address(Some(""), ""), "");
    }
}
