use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

/// Number of metered operations a free-tier user may perform.
pub const FREE_OPERATION_LIMIT: i64 = 10;

/// Subscription tier, sourced from the identity provider's token claims and
/// read-only to this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    /// Unknown claim values degrade to the free tier.
    pub fn from_claim(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("premium") {
            Plan::Premium
        } else {
            Plan::Free
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Premium => "premium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Counted against the free-tier usage counter.
    Metered,
    /// Gated purely on tier; the usage counter is never consulted.
    PremiumOnly,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuotaDenied {
    #[error("Limit reached, Upgrade to continue.")]
    LimitReached,
    #[error("This feature is only available for premium subscriptions.")]
    PremiumRequired,
}

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error(transparent)]
    Denied(#[from] QuotaDenied),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Pure admission decision for one operation.
pub fn decide(plan: Plan, free_usage: i64, class: OperationClass) -> Result<(), QuotaDenied> {
    match (class, plan) {
        (_, Plan::Premium) => Ok(()),
        (OperationClass::Metered, Plan::Free) => {
            if free_usage < FREE_OPERATION_LIMIT {
                Ok(())
            } else {
                Err(QuotaDenied::LimitReached)
            }
        }
        (OperationClass::PremiumOnly, Plan::Free) => Err(QuotaDenied::PremiumRequired),
    }
}

/// Current metered-operation count for a user. A user with no counter row has
/// performed zero operations.
pub async fn current_usage(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    let count: Option<i64> =
        sqlx::query_scalar("SELECT free_usage FROM usage_counters WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(count.unwrap_or(0))
}

/// Admission check for one operation. Reads the counter only when the decision
/// depends on it.
pub async fn authorize(
    pool: &PgPool,
    user_id: &str,
    plan: Plan,
    class: OperationClass,
) -> Result<(), QuotaError> {
    let free_usage = match (plan, class) {
        (Plan::Free, OperationClass::Metered) => current_usage(pool, user_id).await?,
        _ => 0,
    };
    decide(plan, free_usage, class)?;
    Ok(())
}

/// Records one consumed metered operation. No-op for premium users. Runs inside
/// the caller's transaction so the increment lands atomically with the creation
/// insert, and the increment itself is a single conflict-update statement.
pub async fn commit(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    plan: Plan,
) -> Result<(), sqlx::Error> {
    if plan == Plan::Premium {
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO usage_counters (user_id, free_usage)
        VALUES ($1, 1)
        ON CONFLICT (user_id)
        DO UPDATE SET
            free_usage = usage_counters.free_usage + 1,
            updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
