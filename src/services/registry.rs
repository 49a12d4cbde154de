//! Teacher registry generation.
//!
//! A registry is `<PREFIX>-<NNN>`: the department name uppercased, stripped of
//! whitespace and cut to four characters, followed by a sequence number
//! zero-padded to three digits. Past 999 the number simply widens.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::TeacherRepository;

/// Maximum number of characters kept from the department name
pub const PREFIX_LEN: usize = 4;

/// Normalizes a department name into a registry prefix.
///
/// # Errors
/// `Validation` when nothing is left after removing whitespace.
pub fn department_prefix(department: &str) -> AppResult<String> {
    let prefix: String = department
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .take(PREFIX_LEN)
        .collect();

    if prefix.is_empty() {
        return Err(AppError::validation(
            "department",
            "Department must contain at least one non-whitespace character",
        ));
    }
    Ok(prefix)
}

/// Sequence following `last`, or 1 when there is no usable previous registry.
pub fn next_sequence(last: Option<&str>) -> u64 {
    let Some(last) = last else {
        return 1;
    };

    let parsed = last
        .rsplit_once('-')
        .and_then(|(_, suffix)| suffix.parse::<u64>().ok())
        .and_then(|n| n.checked_add(1));

    match parsed {
        Some(next) => next,
        None => {
            tracing::warn!(registry = %last, "Malformed registry suffix, restarting sequence at 1");
            1
        }
    }
}

pub fn compose(prefix: &str, sequence: u64) -> String {
    format!("{prefix}-{sequence:03}")
}

/// True when `registry` is exactly `<prefix>-<digits>`.
///
/// `ART--001` was issued for prefix `ART-`, not `ART`.
pub fn issued_for_prefix(registry: &str, prefix: &str) -> bool {
    match registry.rsplit_once('-') {
        Some((head, digits)) => {
            head == prefix && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Registries compare by length first so `COMP-1000` ranks above `COMP-999`.
fn compare_registries(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Highest registry among `candidates` that was issued for `prefix`.
pub fn latest_registry<I>(candidates: I, prefix: &str) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .filter(|registry| issued_for_prefix(registry, prefix))
        .max_by(|a, b| compare_registries(a, b))
}

/// Generates registries from the highest one already issued for a prefix.
#[derive(Clone)]
pub struct RegistryGenerator {
    repo: Arc<dyn TeacherRepository>,
}

impl RegistryGenerator {
    pub fn new(repo: Arc<dyn TeacherRepository>) -> Self {
        Self { repo }
    }

    /// Computes the next registry for the department.
    ///
    /// Two concurrent calls can return the same value; the unique constraint on
    /// `teachers.registry` rejects the second insert.
    pub async fn generate(&self, department: &str) -> AppResult<String> {
        let prefix = department_prefix(department)?;
        let last = self.repo.last_registry_for_prefix(&prefix).await?;
        let sequence = next_sequence(last.as_deref());

        tracing::debug!(prefix = %prefix, sequence, "Generated registry sequence");
        Ok(compose(&prefix, sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Teacher;
    use crate::repositories::InMemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_department_prefix() {
        assert_eq!(department_prefix("Computer Science").unwrap(), "COMP");
        assert_eq!(department_prefix("Computacao").unwrap(), "COMP");
        assert_eq!(department_prefix("  m a t h  ").unwrap(), "MATH");
        assert_eq!(department_prefix("Art").unwrap(), "ART");
        assert_eq!(department_prefix("física").unwrap(), "FÍSI");
    }

    #[test]
    fn test_department_prefix_rejects_blank() {
        for department in ["", "   ", "\t\n"] {
            assert!(matches!(
                department_prefix(department),
                Err(AppError::Validation { .. })
            ));
        }
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some("COMP-002")), 3);
        assert_eq!(next_sequence(Some("COMP-999")), 1000);
        assert_eq!(next_sequence(Some("COMP-1000")), 1001);
    }

    #[test]
    fn test_next_sequence_restarts_on_malformed_suffix() {
        assert_eq!(next_sequence(Some("COMP-abc")), 1);
        assert_eq!(next_sequence(Some("COMP")), 1);
        assert_eq!(next_sequence(Some("COMP-")), 1);
        assert_eq!(next_sequence(Some("COMP-18446744073709551615")), 1);
    }

    #[test]
    fn test_compose_pads_and_widens() {
        assert_eq!(compose("COMP", 1), "COMP-001");
        assert_eq!(compose("COMP", 42), "COMP-042");
        assert_eq!(compose("COMP", 1000), "COMP-1000");
    }

    #[test]
    fn test_issued_for_prefix() {
        assert!(issued_for_prefix("ART-001", "ART"));
        assert!(issued_for_prefix("ART--001", "ART-"));
        assert!(issued_for_prefix("COMP-1000", "COMP"));
        assert!(!issued_for_prefix("ART--001", "ART"));
        assert!(!issued_for_prefix("ART-001", "ART-"));
        assert!(!issued_for_prefix("COMP-X-9", "COMP"));
        assert!(!issued_for_prefix("COMP-", "COMP"));
        assert!(!issued_for_prefix("COMP-abc", "COMP"));
        assert!(!issued_for_prefix("COMPX-001", "COMP"));
    }

    #[test]
    fn test_latest_registry_ignores_other_prefixes() {
        let candidates = ["ART-001", "ART--009", "ART-002", "ART-X-7", "ARTS-050"]
            .map(String::from);
        assert_eq!(
            latest_registry(candidates.clone(), "ART").as_deref(),
            Some("ART-002")
        );
        assert_eq!(
            latest_registry(candidates, "ART-").as_deref(),
            Some("ART--009")
        );
        assert_eq!(latest_registry(Vec::new(), "ART"), None);
    }

    #[tokio::test]
    async fn test_generate_continues_existing_sequence() {
        let store = InMemoryStore::new();
        for (id, registry) in [
            ("t1", "COMP-001"),
            ("t2", "COMP-002"),
            ("t3", "MATH-007"),
            ("t4", "ART-001"),
            ("t5", "ART--001"),
            ("t6", "COMP-X-9"),
        ] {
            TeacherRepository::insert(
                &store,
                Teacher {
                    id: id.to_string(),
                    registry: registry.to_string(),
                    name: "Teacher".to_string(),
                    department: "Any".to_string(),
                },
            )
            .await
            .unwrap();
        }

        let generator = RegistryGenerator::new(Arc::new(store));
        assert_eq!(generator.generate("Computacao").await.unwrap(), "COMP-003");
        assert_eq!(generator.generate("Mathematics").await.unwrap(), "MATH-008");
        assert_eq!(generator.generate("History").await.unwrap(), "HIST-001");
        assert_eq!(generator.generate("Art").await.unwrap(), "ART-002");
        assert_eq!(generator.generate("Art-History").await.unwrap(), "ART--002");
    }

    proptest! {
        #[test]
        fn prop_registry_format(department in "[A-Za-z ]{0,12}[A-Za-z][A-Za-z ]{0,12}", seq in 1u64..5000) {
            let prefix = department_prefix(&department).unwrap();
            let expected: String = department
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
                .chars()
                .take(PREFIX_LEN)
                .collect();
            prop_assert_eq!(&prefix, &expected);

            let registry = compose(&prefix, seq);
            let (head, digits) = registry.rsplit_once('-').unwrap();
            prop_assert_eq!(head, prefix.as_str());
            prop_assert!(digits.len() >= 3);
            prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
            prop_assert_eq!(next_sequence(Some(&registry)), seq + 1);
        }
    }
}
