//! Query strategy: administrative-token cleaning and candidate generation.
//!
//! Pure transformations of the raw address string. Nothing here touches the
//! network, and nothing here can fail — malformed input just yields a shorter
//! candidate list.

use super::types::CandidateQuery;

/// Administrative-unit noise words stripped from district names before they
/// are used in a query. Providers often index "Sitapur", never
/// "Sitapur District".
const ADMIN_TOKENS: &[&str] = &["district", "zila", "jila", "mandal", "जिला"];

/// Case-insensitive substring search that never shifts byte offsets
/// (`to_lowercase` can, for some scripts). ASCII case folding is enough for
/// the token set; the Devanagari token matches exactly.
fn find_token(haystack: &str, token: &str) -> Option<usize> {
    let n = token.len();
    if n == 0 || haystack.len() < n {
        return None;
    }
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| {
            i + n <= haystack.len()
                && haystack.is_char_boundary(i + n)
                && haystack[i..i + n].eq_ignore_ascii_case(token)
        })
}

/// Remove every occurrence of the fixed admin-token set, case-insensitively,
/// then trim. Idempotent; returns the (trimmed) input when nothing matches.
pub fn clean_admin_tokens(name: &str) -> String {
    let mut cleaned = name.to_string();
    for token in ADMIN_TOKENS {
        // Loop so an occurrence re-assembled by a removal cannot survive.
        while let Some(pos) = find_token(&cleaned, token) {
            cleaned.replace_range(pos..pos + token.len(), "");
        }
    }
    cleaned.trim().to_string()
}

/// Split the raw address on commas and pull out (village, district, state).
/// Requires at least 3 parts; the last part is treated as a country or extra
/// qualifier and ignored, so state is the second-to-last segment.
fn split_parts(full_location: &str) -> Option<(String, String, String)> {
    let parts: Vec<&str> = full_location.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let village = parts[0].to_string();
    let district = clean_admin_tokens(parts[1]);
    let state = parts[parts.len() - 2].to_string();
    Some((village, district, state))
}

/// District and state for the coarse fallback tier. None when the address has
/// fewer than 3 comma-separated parts, in which case the fallback is skipped.
pub fn district_state(full_location: &str) -> Option<(String, String)> {
    split_parts(full_location).map(|(_, district, state)| (district, state))
}

/// Generate the ordered candidate list for one address, most specific first.
///
/// Rank 0 is always the raw string. When the address parses into at least
/// village/district/state, rank 1 re-joins the cleaned components and rank 2
/// drops the district (provider indexes sometimes miss the district name but
/// know the village within the state).
pub fn candidate_queries(full_location: &str) -> Vec<CandidateQuery> {
    let mut queries = vec![CandidateQuery {
        text: full_location.to_string(),
        rank: 0,
    }];

    if let Some((village, district, state)) = split_parts(full_location) {
        queries.push(CandidateQuery {
            text: format!("{}, {}, {}", village, district, state),
            rank: 1,
        });
        queries.push(CandidateQuery {
            text: format!("{}, {}", village, state),
            rank: 2,
        });
    }

    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_district_word() {
        assert_eq!(clean_admin_tokens("Sitapur District"), "Sitapur");
        assert_eq!(clean_admin_tokens("Sitapur Zila"), "Sitapur");
        assert_eq!(clean_admin_tokens("Warangal Mandal"), "Warangal");
    }

    #[test]
    fn test_clean_case_insensitive() {
        assert_eq!(clean_admin_tokens("Sitapur DISTRICT"), "Sitapur");
        assert_eq!(clean_admin_tokens("sitapur District"), "sitapur");
    }

    #[test]
    fn test_clean_devanagari_token() {
        assert_eq!(clean_admin_tokens("सीतापुर जिला"), "सीतापुर");
    }

    #[test]
    fn test_clean_no_match_returns_input() {
        assert_eq!(clean_admin_tokens("Lucknow"), "Lucknow");
        assert_eq!(clean_admin_tokens(""), "");
    }

    #[test]
    fn test_clean_idempotent() {
        for input in ["Sitapur District", "जिला जिला", "  plain  ", "disdistricttrict"] {
            let once = clean_admin_tokens(input);
            assert_eq!(clean_admin_tokens(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_clean_removes_all_occurrences() {
        // A removal that re-assembles the token must not survive one pass.
        assert_eq!(clean_admin_tokens("disdistricttrict"), "");
    }

    #[test]
    fn test_candidates_full_address() {
        let queries = candidate_queries("Rampur, Sitapur District, Uttar Pradesh, India");
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].rank, 0);
        assert_eq!(queries[0].text, "Rampur, Sitapur District, Uttar Pradesh, India");
        assert_eq!(queries[1].text, "Rampur, Sitapur, Uttar Pradesh");
        assert_eq!(queries[2].text, "Rampur, Uttar Pradesh");
        assert_eq!(queries[2].rank, 2);
    }

    #[test]
    fn test_candidates_three_parts() {
        // With exactly 3 parts the state slot is still the second-to-last
        // segment, which coincides with the district. The last segment is
        // always treated as a possible country/extra qualifier.
        let queries = candidate_queries("Rampur, Sitapur, Uttar Pradesh");
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[1].text, "Rampur, Sitapur, Sitapur");
        assert_eq!(queries[2].text, "Rampur, Sitapur");
    }

    #[test]
    fn test_candidates_short_address_degrades() {
        let queries = candidate_queries("Unknown Place");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].rank, 0);

        let queries = candidate_queries("Rampur, Uttar Pradesh");
        assert_eq!(queries.len(), 1);
    }

    #[test]
    fn test_candidates_empty_input() {
        let queries = candidate_queries("");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].text, "");
    }

    #[test]
    fn test_district_state_parse() {
        let (district, state) =
            district_state("Rampur, Sitapur District, Uttar Pradesh, India").unwrap();
        assert_eq!(district, "Sitapur");
        assert_eq!(state, "Uttar Pradesh");
    }

    #[test]
    fn test_district_state_too_few_parts() {
        assert!(district_state("Unknown Place").is_none());
        assert!(district_state("Rampur, Uttar Pradesh").is_none());
    }
}
