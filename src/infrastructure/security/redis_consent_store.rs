// src/infrastructure/security/redis_consent_store.rs
use crate::domain::client::ClientId;
use crate::domain::consent::{ConsentRecord, ConsentStore, SubjectId};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;

/// Durable consent storage. One key per (subject, client) pair so every
/// write is a single atomic replace; a per-subject set indexes the pairs.
#[derive(Clone)]
pub struct RedisConsentStore {
    pool: Pool,
}

impl RedisConsentStore {
    /// Create a new Redis backed consent store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> DomainResult<Self> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| DomainError::Persistence(err.to_string()))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> DomainResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| DomainError::Persistence(err.to_string()))
    }
}

// Length-prefixed so subjects containing ':' cannot collide.
fn record_key(subject_id: &SubjectId, client_id: &ClientId) -> String {
    let subject = subject_id.as_str();
    format!("consent:{}:{}:{}", subject.len(), subject, client_id)
}

fn index_key(subject_id: &SubjectId) -> String {
    format!("consent_index:{}", subject_id)
}

fn persistence(err: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence(err.to_string())
}

#[async_trait]
impl ConsentStore for RedisConsentStore {
    async fn find(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
    ) -> DomainResult<Option<ConsentRecord>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get(record_key(subject_id, client_id))
            .await
            .map_err(persistence)?;

        raw.map(|json| serde_json::from_str(&json).map_err(persistence))
            .transpose()
    }

    async fn upsert(&self, record: ConsentRecord) -> DomainResult<()> {
        let mut conn = self.conn().await?;
        let key = record_key(&record.subject_id, &record.client_id);
        let index = index_key(&record.subject_id);
        let json = serde_json::to_string(&record).map_err(persistence)?;
        // 0 means no expiry
        let ttl_secs = record
            .expires_at
            .map(|exp| (exp - Utc::now()).num_seconds().max(1))
            .unwrap_or(0);

        // Replace the record, refresh its TTL and index it in one step.
        let script = r#"
            redis.call('SET', KEYS[1], ARGV[1])
            if tonumber(ARGV[3]) > 0 then
                redis.call('EXPIRE', KEYS[1], ARGV[3])
            end
            redis.call('SADD', KEYS[2], ARGV[2])
            return 1
        "#;

        let _: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(2)
            .arg(&key)
            .arg(&index)
            .arg(json)
            .arg(record.client_id.as_str())
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(persistence)?;
        Ok(())
    }

    async fn remove(&self, subject_id: &SubjectId, client_id: &ClientId) -> DomainResult<bool> {
        let mut conn = self.conn().await?;
        let removed: i32 = conn
            .del(record_key(subject_id, client_id))
            .await
            .map_err(persistence)?;
        conn.srem::<_, _, ()>(index_key(subject_id), client_id.as_str())
            .await
            .map_err(persistence)?;
        Ok(removed > 0)
    }

    async fn remove_if_unchanged(&self, record: &ConsentRecord) -> DomainResult<bool> {
        let mut conn = self.conn().await?;
        let json = serde_json::to_string(record).map_err(persistence)?;

        // Compare-and-delete so a concurrent upsert for the pair survives.
        let script = r#"
            if redis.call('GET', KEYS[1]) == ARGV[1] then
                redis.call('DEL', KEYS[1])
                redis.call('SREM', KEYS[2], ARGV[2])
                return 1
            end
            return 0
        "#;

        let removed: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(2)
            .arg(record_key(&record.subject_id, &record.client_id))
            .arg(index_key(&record.subject_id))
            .arg(json)
            .arg(record.client_id.as_str())
            .query_async(&mut conn)
            .await
            .map_err(persistence)?;
        Ok(removed > 0)
    }

    async fn list_for_subject(&self, subject_id: &SubjectId) -> DomainResult<Vec<ConsentRecord>> {
        let mut conn = self.conn().await?;
        let client_ids: Vec<String> = conn
            .smembers(index_key(subject_id))
            .await
            .map_err(persistence)?;

        let mut records = Vec::with_capacity(client_ids.len());
        for raw in client_ids {
            let client_id = ClientId::new(raw)?;
            let json: Option<String> = conn
                .get(record_key(subject_id, &client_id))
                .await
                .map_err(persistence)?;
            match json {
                Some(json) => records.push(serde_json::from_str(&json).map_err(persistence)?),
                // expired by redis; drop the stale index entry
                None => conn
                    .srem::<_, _, ()>(index_key(subject_id), client_id.as_str())
                    .await
                    .map_err(persistence)?,
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_do_not_collide() {
        let a = record_key(
            &SubjectId::new("a:b").unwrap(),
            &ClientId::new("c").unwrap(),
        );
        let b = record_key(
            &SubjectId::new("a").unwrap(),
            &ClientId::new("b:c").unwrap(),
        );
        assert_ne!(a, b);
    }
}
