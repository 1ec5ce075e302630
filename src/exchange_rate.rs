/// One persisted quote.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExchangeRate {
    pub id: i64,
    pub valor: f64,
    pub moeda: String,
}
