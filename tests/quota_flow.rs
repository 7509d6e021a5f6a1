use scribe_backend::quota::{self, OperationClass, Plan};
use sqlx::PgPool;

async fn commit_once(pool: &PgPool, user_id: &str, plan: Plan) {
    let mut tx = pool.begin().await.unwrap();
    quota::commit(&mut tx, user_id, plan).await.unwrap();
    tx.commit().await.unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn counter_row_appears_on_first_commit(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    assert_eq!(quota::current_usage(&pool, "user_new").await.unwrap(), 0);
    commit_once(&pool, "user_new", Plan::Free).await;
    assert_eq!(quota::current_usage(&pool, "user_new").await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn premium_commit_is_a_no_op(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    commit_once(&pool, "user_premium", Plan::Premium).await;
    assert_eq!(
        quota::current_usage(&pool, "user_premium").await.unwrap(),
        0
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn concurrent_commits_all_counted(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { commit_once(&pool, "user_racy", Plan::Free).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(quota::current_usage(&pool, "user_racy").await.unwrap(), 4);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn authorization_flips_after_ten_commits(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    for _ in 0..10 {
        quota::authorize(&pool, "user_limit", Plan::Free, OperationClass::Metered)
            .await
            .unwrap();
        commit_once(&pool, "user_limit", Plan::Free).await;
    }

    let denied = quota::authorize(&pool, "user_limit", Plan::Free, OperationClass::Metered)
        .await
        .unwrap_err();
    assert_eq!(
        denied.to_string(),
        "Limit reached, Upgrade to continue."
    );

    // The same user on premium is unaffected by the counter.
    quota::authorize(&pool, "user_limit", Plan::Premium, OperationClass::Metered)
        .await
        .unwrap();
}
