//! Participant filters for `creator:` and `with:`.

use crate::core::types::{DOMAIN_PREFIX, ParticipantId};
use crate::query::compiler::ParsedQuery;
use crate::query::error::{SearchError, SearchResult};
use crate::query::types::QueryParameterKind;
use std::borrow::Cow;

/// Apply the local domain to a raw participant value:
/// `alice` becomes `alice@<domain>`, a lone `@` is the shared participant
/// `@<domain>`, anything else is taken as typed.
pub fn normalize_participant<'a>(raw: &'a str, local_domain: &str) -> Cow<'a, str> {
    if raw == DOMAIN_PREFIX {
        Cow::Owned(format!("{}{}", DOMAIN_PREFIX, local_domain))
    } else if !raw.is_empty() && !raw.contains(DOMAIN_PREFIX) {
        Cow::Owned(format!("{}{}{}", raw, DOMAIN_PREFIX, local_domain))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Build the participant ids for `kind` in query order. An absent key yields
/// an empty list; the first malformed address fails the whole list.
pub fn build_validated_participant_ids(
    parsed: &ParsedQuery,
    kind: QueryParameterKind,
    local_domain: &str,
) -> SearchResult<Vec<ParticipantId>> {
    parsed
        .values(kind)
        .map(|raw| {
            ParticipantId::of(&normalize_participant(raw, local_domain))
                .map_err(|reason| SearchError::invalid_address(raw, reason))
        })
        .collect()
}
