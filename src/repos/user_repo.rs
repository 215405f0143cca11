/*
 * Responsibility
 * - CRUD over the in-memory users table
 * - take a &Db, hand back rows; uniqueness violations come back as RepoError
 * - Db doubles as the authenticator's UserLookup
 */
use crate::repos::{Db, error::RepoError};
use crate::services::auth::{Account, UserLookup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
}

/// Fields to change; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

fn username_taken<'a>(
    mut rows: impl Iterator<Item = &'a UserRow>,
    username: &str,
    except: Option<i64>,
) -> bool {
    rows.any(|u| Some(u.id) != except && u.username.eq_ignore_ascii_case(username))
}

pub fn list(db: &Db) -> Result<Vec<UserRow>, RepoError> {
    Ok(db.read().users.values().cloned().collect())
}

pub fn create(db: &Db, new: NewUserRow) -> Result<UserRow, RepoError> {
    let mut tables = db.write();

    if username_taken(tables.users.values(), &new.username, None) {
        return Err(RepoError::Conflict { field: "username" });
    }

    tables.last_user_id += 1;
    let row = UserRow {
        id: tables.last_user_id,
        first_name: new.first_name,
        last_name: new.last_name,
        username: new.username,
        password_hash: new.password_hash,
    };
    tables.users.insert(row.id, row.clone());

    Ok(row)
}

pub fn get(db: &Db, user_id: i64) -> Result<Option<UserRow>, RepoError> {
    Ok(db.read().users.get(&user_id).cloned())
}

pub fn find_by_username(db: &Db, username: &str) -> Result<Option<UserRow>, RepoError> {
    Ok(db
        .read()
        .users
        .values()
        .find(|u| u.username.eq_ignore_ascii_case(username))
        .cloned())
}

pub fn update(db: &Db, user_id: i64, patch: UserPatch) -> Result<Option<UserRow>, RepoError> {
    let mut tables = db.write();

    if let Some(username) = &patch.username
        && username_taken(tables.users.values(), username, Some(user_id))
    {
        return Err(RepoError::Conflict { field: "username" });
    }

    let Some(row) = tables.users.get_mut(&user_id) else {
        return Ok(None);
    };

    if let Some(v) = patch.first_name {
        row.first_name = v;
    }
    if let Some(v) = patch.last_name {
        row.last_name = v;
    }
    if let Some(v) = patch.username {
        row.username = v;
    }
    if let Some(v) = patch.password_hash {
        row.password_hash = v;
    }

    Ok(Some(row.clone()))
}

pub fn delete(db: &Db, user_id: i64) -> Result<bool, RepoError> {
    Ok(db.write().users.remove(&user_id).is_some())
}

impl UserLookup for Db {
    fn lookup_by_id(&self, id: i64) -> Result<Option<Account>, RepoError> {
        Ok(get(self, id)?.map(|row| Account {
            id: row.id,
            username: row.username,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUserRow {
        NewUserRow {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let db = Db::new();
        let a = create(&db, new_user("ada")).unwrap();
        let b = create(&db, new_user("bob")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(delete(&db, b.id).unwrap());
        let c = create(&db, new_user("cy")).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn usernames_are_unique_ignoring_case() {
        let db = Db::new();
        create(&db, new_user("ada")).unwrap();

        let err = create(&db, new_user("ADA")).unwrap_err();
        assert!(matches!(err, RepoError::Conflict { field: "username" }));
        assert!(find_by_username(&db, "Ada").unwrap().is_some());
    }

    #[test]
    fn update_touches_only_given_fields() {
        let db = Db::new();
        let ada = create(&db, new_user("ada")).unwrap();
        create(&db, new_user("bob")).unwrap();

        let patch = UserPatch {
            last_name: Some("Byron".into()),
            ..Default::default()
        };
        let row = update(&db, ada.id, patch).unwrap().unwrap();
        assert_eq!(row.first_name, "Ada");
        assert_eq!(row.last_name, "Byron");

        let rename = UserPatch {
            username: Some("bob".into()),
            ..Default::default()
        };
        assert!(update(&db, ada.id, rename).is_err());

        // keeping your own name is not a conflict
        let same = UserPatch {
            username: Some("ADA".into()),
            ..Default::default()
        };
        assert_eq!(update(&db, ada.id, same).unwrap().unwrap().username, "ADA");

        assert!(update(&db, 99, UserPatch::default()).unwrap().is_none());
    }

    #[test]
    fn lookup_follows_deletes() {
        let db = Db::new();
        let ada = create(&db, new_user("ada")).unwrap();

        let account = db.lookup_by_id(ada.id).unwrap().unwrap();
        assert_eq!(account.username, "ada");

        delete(&db, ada.id).unwrap();
        assert!(db.lookup_by_id(ada.id).unwrap().is_none());
    }
}
