//! Seed helpers for service tests: an in-memory sqlite database with the
//! real migrations applied, plus direct entity inserts.

use crate::database::DbConn;
use crate::entities::*;
use chrono::{DateTime, Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use uuid::Uuid;

/// A single-connection pool so every statement sees the same `:memory:`
/// database.
pub async fn setup_test_db() -> DbConn {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&conn, None)
        .await
        .expect("failed to run migrations");
    conn
}

pub async fn insert_user(conn: &DbConn, username: &str) -> user_entity::Model {
    insert_user_with_country(conn, username, None).await
}

pub async fn insert_user_with_country(
    conn: &DbConn,
    username: &str,
    country_id: Option<Uuid>,
) -> user_entity::Model {
    let now = Utc::now();
    user_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(None),
        country_id: Set(country_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert user")
}

pub async fn insert_game(
    conn: &DbConn,
    name: &str,
    base_price_cents: Option<i64>,
) -> game_entity::Model {
    let now = Utc::now();
    game_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        base_price_cents: Set(base_price_cents),
        is_free_to_play: Set(false),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert game")
}

pub async fn insert_free_game(conn: &DbConn, name: &str) -> game_entity::Model {
    let now = Utc::now();
    game_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        base_price_cents: Set(None),
        is_free_to_play: Set(true),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert free game")
}

pub async fn insert_deleted_game(
    conn: &DbConn,
    name: &str,
    base_price_cents: Option<i64>,
) -> game_entity::Model {
    let now = Utc::now();
    game_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        base_price_cents: Set(base_price_cents),
        is_free_to_play: Set(false),
        is_deleted: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert deleted game")
}

pub async fn insert_country_price(
    conn: &DbConn,
    game_id: Uuid,
    country_id: Uuid,
    price_cents: i64,
) -> country_price_entity::Model {
    country_price_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        game_id: Set(game_id),
        country_id: Set(country_id),
        price_cents: Set(price_cents),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("failed to insert country price")
}

pub async fn insert_purchase(
    conn: &DbConn,
    user_id: Uuid,
    game_id: Uuid,
    price_paid_cents: i64,
) -> purchase_entity::Model {
    purchase_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        game_id: Set(game_id),
        price_paid_cents: Set(price_paid_cents),
        purchased_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("failed to insert purchase")
}

/// Creates a plan with one pricing option and the given bundle, returning
/// (plan, pricing option).
pub async fn insert_plan(
    conn: &DbConn,
    name: &str,
    price_cents: i64,
    game_ids: &[Uuid],
) -> (
    subscription_plan_entity::Model,
    plan_pricing_option_entity::Model,
) {
    let now = Utc::now();
    let plan = subscription_plan_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert plan");

    let option = plan_pricing_option_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        plan_id: Set(plan.id),
        duration_days: Set(30),
        price_cents: Set(price_cents),
        created_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("failed to insert pricing option");

    for game_id in game_ids {
        plan_game_entity::ActiveModel {
            plan_id: Set(plan.id),
            game_id: Set(*game_id),
        }
        .insert(conn)
        .await
        .expect("failed to insert plan game");
    }

    (plan, option)
}

pub async fn insert_subscription(
    conn: &DbConn,
    user_id: Uuid,
    option: &plan_pricing_option_entity::Model,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> user_subscription_entity::Model {
    user_subscription_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        pricing_option_id: Set(option.id),
        price_cents: Set(option.price_cents),
        starts_at: Set(starts_at),
        ends_at: Set(ends_at),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("failed to insert subscription")
}

/// An active 30-day subscription starting an hour ago.
pub async fn insert_active_subscription(
    conn: &DbConn,
    user_id: Uuid,
    option: &plan_pricing_option_entity::Model,
) -> user_subscription_entity::Model {
    let starts = Utc::now() - Duration::hours(1);
    insert_subscription(conn, user_id, option, starts, starts + Duration::days(30)).await
}

/// A subscription that lapsed yesterday.
pub async fn insert_expired_subscription(
    conn: &DbConn,
    user_id: Uuid,
    option: &plan_pricing_option_entity::Model,
) -> user_subscription_entity::Model {
    let starts = Utc::now() - Duration::days(31);
    insert_subscription(conn, user_id, option, starts, Utc::now() - Duration::days(1)).await
}
