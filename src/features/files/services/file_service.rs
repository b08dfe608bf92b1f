use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::clients::Client;
use crate::features::files::models::File;
use crate::features::notifications::models::FileReminder;
use crate::features::notifications::ports::ExpiringFileSource;

/// Read access to tracked files for the reminder job
pub struct FileService {
    pool: PgPool,
}

impl FileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Files whose expiry date lies in `[start, end]`, soonest first
    pub async fn list_expiring_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<File>> {
        sqlx::query_as::<_, File>(
            r#"
            SELECT id, file_name, client_id, email, master_id, publish_date, expired_date,
                   reminder_subject, reminder_body, file_url, created_at, updated_at
            FROM files
            WHERE expired_date BETWEEN $1 AND $2
            ORDER BY expired_date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list expiring files: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Load the clients with the given ids
    pub async fn find_clients(&self, ids: &[Uuid]) -> Result<Vec<Client>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, client_name, first_email, second_email, first_phone, second_phone,
                   address, business_type, status, created_at, updated_at
            FROM clients
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load clients for expiring files: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[async_trait]
impl ExpiringFileSource for FileService {
    async fn find_files_expiring_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FileReminder>> {
        let files = self.list_expiring_between(start, end).await?;

        let mut client_ids: Vec<Uuid> = files.iter().filter_map(|f| f.client_id).collect();
        client_ids.sort_unstable();
        client_ids.dedup();

        let clients = self.find_clients(&client_ids).await?;

        Ok(attach_clients(files, clients))
    }
}

/// Pair each file with its client, keeping file order
fn attach_clients(files: Vec<File>, clients: Vec<Client>) -> Vec<FileReminder> {
    let clients: HashMap<Uuid, Client> = clients.into_iter().map(|c| (c.id, c)).collect();

    files
        .into_iter()
        .map(|file| {
            let client = file.client_id.and_then(|id| clients.get(&id));
            if file.client_id.is_some() && client.is_none() {
                tracing::warn!(
                    "File {} references missing client {:?}",
                    file.id,
                    file.client_id
                );
            }
            FileReminder::new(file, client)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{client_with_emails, file_expiring_at};

    #[test]
    fn test_attach_clients_links_by_id() {
        let client = client_with_emails("a@pt-maju.co.id", Some("b@pt-maju.co.id"));

        let mut linked = file_expiring_at(Utc::now());
        linked.client_id = Some(client.id);
        let mut legacy = file_expiring_at(Utc::now());
        legacy.email = Some("legacy@cv-sentosa.id".to_string());

        let linked_id = linked.id;
        let legacy_id = legacy.id;

        let reminders = attach_clients(vec![linked, legacy], vec![client.clone()]);

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].file_id, linked_id);
        assert_eq!(
            reminders[0].client.as_ref().map(|c| c.name.as_str()),
            Some(client.client_name.as_str())
        );
        assert_eq!(reminders[1].file_id, legacy_id);
        assert!(reminders[1].client.is_none());
        assert_eq!(
            reminders[1].inline_email.as_deref(),
            Some("legacy@cv-sentosa.id")
        );
    }

    #[test]
    fn test_attach_clients_tolerates_missing_client() {
        let mut orphan = file_expiring_at(Utc::now());
        orphan.client_id = Some(Uuid::new_v4());

        let reminders = attach_clients(vec![orphan], vec![]);

        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].client.is_none());
        assert_eq!(reminders[0].recipient(), None);
    }

    async fn insert_file(
        pool: &PgPool,
        master_id: Uuid,
        client_id: Option<Uuid>,
        expired_date: DateTime<Utc>,
    ) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO files (file_name, client_id, master_id, publish_date, expired_date,
                               reminder_subject, reminder_body, file_url)
            VALUES ($1, $2, $3, $4, $4, 'Pengingat', '<p>Perpanjang</p>', $5)
            RETURNING id
            "#,
        )
        .bind(format!("window-test {}", expired_date))
        .bind(client_id)
        .bind(master_id)
        .bind(expired_date)
        .bind(format!("{}.pdf", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .expect("insert file")
    }

    #[tokio::test]
    #[ignore = "needs a reachable Postgres in DATABASE_URL"]
    async fn test_expiring_query_bounds_with_database() {
        use chrono::{Duration, TimeZone};

        let _ = dotenvy::dotenv();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let pool = PgPool::connect(&url).await.expect("pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");

        let now = Utc.with_ymd_and_hms(2001, 3, 4, 5, 6, 7).unwrap();

        let master_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO masters (name, max_size) VALUES ('Window test', 5) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .expect("insert master");
        let client_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO clients (client_name, first_email, first_phone, address, business_type)
            VALUES ('PT Jendela Uji', 'uji@pt-jendela.co.id', '0800', 'Jl. Uji', 'Testing')
            RETURNING id
            "#,
        )
        .fetch_one(&pool)
        .await
        .expect("insert client");

        let at_now = insert_file(&pool, master_id, Some(client_id), now).await;
        let at_start = insert_file(&pool, master_id, None, now - Duration::hours(24)).await;
        let too_old = insert_file(&pool, master_id, None, now - Duration::hours(25)).await;
        let not_yet = insert_file(&pool, master_id, None, now + Duration::seconds(1)).await;

        let service = FileService::new(pool.clone());
        let reminders = service
            .find_files_expiring_between(now - Duration::hours(24), now)
            .await
            .expect("query");
        let ids: Vec<Uuid> = reminders.iter().map(|r| r.file_id).collect();

        assert!(ids.contains(&at_now));
        assert!(ids.contains(&at_start));
        assert!(!ids.contains(&too_old));
        assert!(!ids.contains(&not_yet));

        let linked = reminders
            .iter()
            .find(|r| r.file_id == at_now)
            .expect("file at now");
        assert_eq!(linked.recipient().as_deref(), Some("uji@pt-jendela.co.id"));

        sqlx::query("DELETE FROM files WHERE master_id = $1")
            .bind(master_id)
            .execute(&pool)
            .await
            .expect("cleanup files");
        sqlx::query("DELETE FROM masters WHERE id = $1")
            .bind(master_id)
            .execute(&pool)
            .await
            .expect("cleanup master");
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&pool)
            .await
            .expect("cleanup client");
    }
}
