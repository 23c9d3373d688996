//! # Display Names
//!
//! Versioned constant table mapping world-map display names to country
//! codes. Data, not logic: bump [`NAME_TABLE_VERSION`] whenever an entry
//! changes. Several names may map to the same code ("Macedonia" and
//! "North Macedonia").

use crate::primitives::CountryCode;

/// Revision of [`DISPLAY_NAMES`].
pub const NAME_TABLE_VERSION: u32 = 1;

/// `(display name, country code)` pairs, sorted by display name.
pub const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Albania", "AL"),
    ("Algeria", "DZ"),
    ("Andorra", "AD"),
    ("Angola", "AO"),
    ("Antigua and Barbuda", "AG"),
    ("Argentina", "AR"),
    ("Armenia", "AM"),
    ("Aruba", "AW"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Azerbaijan", "AZ"),
    ("Bahamas", "BS"),
    ("Bahrain", "BH"),
    ("Bangladesh", "BD"),
    ("Barbados", "BB"),
    ("Belarus", "BY"),
    ("Belgium", "BE"),
    ("Belize", "BZ"),
    ("Benin", "BJ"),
    ("Bhutan", "BT"),
    ("Bolivia", "BO"),
    ("Bosnia and Herzegovina", "BA"),
    ("Botswana", "BW"),
    ("Brazil", "BR"),
    ("British Virgin Islands", "VG"),
    ("Bulgaria", "BG"),
    ("Burkina Faso", "BF"),
    ("Burundi", "BI"),
    ("Cambodia", "KH"),
    ("Cameroon", "CM"),
    ("Canada", "CA"),
    ("Cape Verde", "CV"),
    ("Central African Republic", "CF"),
    ("Chad", "TD"),
    ("Chile", "CL"),
    ("Colombia", "CO"),
    ("Comoros", "KM"),
    ("Congo", "CG"),
    ("Costa Rica", "CR"),
    ("Cote d'Ivoire", "CI"),
    ("Croatia", "HR"),
    ("Cuba", "CU"),
    ("Curacao", "CW"),
    ("Czech Republic", "CZ"),
    ("Democratic Republic of the Congo", "CD"),
    ("Denmark", "DK"),
    ("Djibouti", "DJ"),
    ("Dominica", "DM"),
    ("Dominican Republic", "DO"),
    ("Ecuador", "EC"),
    ("Egypt", "EG"),
    ("El Salvador", "SV"),
    ("England", "GB"),
    ("Equatorial Guinea", "GQ"),
    ("Eritrea", "ER"),
    ("Estonia", "EE"),
    ("Eswatini", "SZ"),
    ("Ethiopia", "ET"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("French Guiana", "GF"),
    ("Gabon", "GA"),
    ("Gambia", "GM"),
    ("Georgia", "GE"),
    ("Germany", "DE"),
    ("Ghana", "GH"),
    ("Greece", "GR"),
    ("Grenada", "GD"),
    ("Guatemala", "GT"),
    ("Guinea", "GN"),
    ("Guinea-Bissau", "GW"),
    ("Guyana", "GY"),
    ("Haiti", "HT"),
    ("Honduras", "HN"),
    ("Hong Kong", "HK"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Iraq", "IQ"),
    ("Ireland", "IE"),
    ("Israel", "IL"),
    ("Italy", "IT"),
    ("Jamaica", "JM"),
    ("Japan", "JP"),
    ("Jordan", "JO"),
    ("Kazakhstan", "KZ"),
    ("Kenya", "KE"),
    ("Kosovo", "XK"),
    ("Kuwait", "KW"),
    ("Kyrgyzstan", "KG"),
    ("Laos", "LA"),
    ("Latvia", "LV"),
    ("Lebanon", "LB"),
    ("Lesotho", "LS"),
    ("Liberia", "LR"),
    ("Libya", "LY"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Macedonia", "MK"),
    ("Madagascar", "MG"),
    ("Malawi", "MW"),
    ("Malaysia", "MY"),
    ("Mali", "ML"),
    ("Malta", "MT"),
    ("Mauritania", "MR"),
    ("Mayotte", "YT"),
    ("Mexico", "MX"),
    ("Moldova", "MD"),
    ("Mongolia", "MN"),
    ("Montenegro", "ME"),
    ("Morocco", "MA"),
    ("Mozambique", "MZ"),
    ("Myanmar", "MM"),
    ("Namibia", "NA"),
    ("Nepal", "NP"),
    ("Netherlands", "NL"),
    ("New Zealand", "NZ"),
    ("Nicaragua", "NI"),
    ("Niger", "NE"),
    ("Nigeria", "NG"),
    ("North Korea", "KP"),
    ("North Macedonia", "MK"),
    ("Norway", "NO"),
    ("Oman", "OM"),
    ("Pakistan", "PK"),
    ("Panama", "PA"),
    ("Papua New Guinea", "PG"),
    ("Paraguay", "PY"),
    ("Peru", "PE"),
    ("Philippines", "PH"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Puerto Rico", "PR"),
    ("Qatar", "QA"),
    ("Republic of Serbia", "RS"),
    ("Republic of the Congo", "CG"),
    ("Reunion", "RE"),
    ("Romania", "RO"),
    ("Russia", "RU"),
    ("Rwanda", "RW"),
    ("Saint Helena", "SH"),
    ("Saint Kitts and Nevis", "KN"),
    ("Saint Lucia", "LC"),
    ("Saint Vincent and the Grenadines", "VC"),
    ("Sao Tome and Principe", "ST"),
    ("Saudi Arabia", "SA"),
    ("Senegal", "SN"),
    ("Serbia", "RS"),
    ("Seychelles", "SC"),
    ("Sierra Leone", "SL"),
    ("Singapore", "SG"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("Somalia", "SO"),
    ("South Africa", "ZA"),
    ("South Korea", "KR"),
    ("Spain", "ES"),
    ("Sri Lanka", "LK"),
    ("Sudan", "SD"),
    ("Suriname", "SR"),
    ("Sweden", "SE"),
    ("Switzerland", "CH"),
    ("Syria", "SY"),
    ("Taiwan", "TW"),
    ("Tanzania", "TZ"),
    ("Thailand", "TH"),
    ("Togo", "TG"),
    ("Trinidad and Tobago", "TT"),
    ("Tunisia", "TN"),
    ("Turkey", "TR"),
    ("U.S. Virgin Islands", "VI"),
    ("USA", "US"),
    ("Uganda", "UG"),
    ("Ukraine", "UA"),
    ("United Arab Emirates", "AE"),
    ("United Republic of Tanzania", "TZ"),
    ("Uruguay", "UY"),
    ("Venezuela", "VE"),
    ("Vietnam", "VN"),
    ("Yemen", "YE"),
    ("Zambia", "ZM"),
    ("Zimbabwe", "ZW"),
];

/// Resolve a map display name to its country code.
///
/// Matching is exact and case-sensitive, like the map data it serves.
#[must_use]
pub fn resolve_display_name_to_code(name: &str) -> Option<CountryCode> {
    DISPLAY_NAMES
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .and_then(|idx| DISPLAY_NAMES.get(idx))
        .and_then(|(_, code)| CountryCode::parse(code))
}

/// All display names that map to a code, in table order.
pub fn display_names_for(code: &CountryCode) -> impl Iterator<Item = &'static str> + '_ {
    DISPLAY_NAMES
        .iter()
        .filter(move |(_, candidate)| *candidate == code.as_str())
        .map(|(name, _)| *name)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in DISPLAY_NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{:?} !< {:?}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn every_code_is_valid() {
        for (name, code) in DISPLAY_NAMES {
            assert!(CountryCode::is_valid(code), "{name} -> {code}");
        }
    }

    #[test]
    fn resolves_known_names_and_aliases() {
        let code = |name: &str| resolve_display_name_to_code(name).map(|c| c.to_string());
        assert_eq!(code("USA"), Some("US".to_string()));
        assert_eq!(code("England"), Some("GB".to_string()));
        assert_eq!(code("Republic of Serbia"), Some("RS".to_string()));
        assert_eq!(code("Serbia"), Some("RS".to_string()));
        assert_eq!(code("Cote d'Ivoire"), Some("CI".to_string()));
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(resolve_display_name_to_code("Atlantis").is_none());
        assert!(resolve_display_name_to_code("usa").is_none());
        assert!(resolve_display_name_to_code("").is_none());
    }

    #[test]
    fn reverse_lookup_lists_aliases() {
        let mk = CountryCode::parse("MK");
        let names: Vec<_> = mk.iter().flat_map(display_names_for).collect();
        assert_eq!(names, vec!["Macedonia", "North Macedonia"]);
    }
}
