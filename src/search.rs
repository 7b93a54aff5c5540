use crate::model::User;

/// Narrow a user list to records whose name, email, or phone contains the
/// query as a case-insensitive substring. Order is preserved and the empty
/// query matches everything. Pure projection over the store snapshot; it is
/// recomputed on every render rather than cached.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    if query.is_empty() {
        return users.iter().collect();
    }
    let needle = query.to_lowercase();
    users
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
                || u.phone.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn make_user(id: u64, name: &str, email: &str, phone: &str) -> User {
        User {
            id,
            name: name.to_string(),
            username: None,
            email: email.to_string(),
            phone: phone.to_string(),
            website: None,
            address: Address::default(),
            company: None,
        }
    }

    fn sample() -> Vec<User> {
        vec![
            make_user(1, "Leanne Graham", "Sincere@april.biz", "1-770-736-8031"),
            make_user(2, "Ervin Howell", "Shanna@melissa.tv", "010-692-6593"),
            make_user(3, "Clementine Bauch", "Nathan@yesenia.net", "1-463-123-4447"),
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        let users = sample();
        let out = filter_users(&users, "");
        assert_eq!(out.len(), users.len());
        for (got, want) in out.iter().zip(users.iter()) {
            assert_eq!(got.id, want.id);
        }
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let users = sample();
        let out = filter_users(&users, "LEANNE");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_matches_email_and_phone() {
        let users = sample();
        assert_eq!(filter_users(&users, "melissa.tv")[0].id, 2);
        assert_eq!(filter_users(&users, "463-123")[0].id, 3);
    }

    #[test]
    fn test_preserves_order_and_excludes_nonmatches() {
        let users = sample();
        // "1-" appears in two phone numbers; order must follow the input.
        let out = filter_users(&users, "1-");
        let ids: Vec<u64> = out.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        for user in &out {
            assert!(
                user.name.to_lowercase().contains("1-")
                    || user.email.to_lowercase().contains("1-")
                    || user.phone.to_lowercase().contains("1-")
            );
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let users = sample();
        let once: Vec<User> = filter_users(&users, "nathan")
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<User> = filter_users(&once, "nathan")
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let users = sample();
        assert!(filter_users(&users, "zzz-no-such-user").is_empty());
    }
}
