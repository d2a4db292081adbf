use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxContentRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}
