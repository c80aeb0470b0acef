use sea_orm::{
    DbErr, EntityTrait, QueryFilter, Select, SqlErr,
    sea_query::{Expr, Func, LikeExpr},
};

const LIKE_ESCAPE: char = '\\';

/// `true` when `err` was raised by a unique index or constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Escape `%`, `_` and the escape character itself so `input` matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub trait FilterStartsWithCi<E: EntityTrait> {
    /// Keep rows whose `column` starts with `prefix`, ignoring ASCII case.
    fn filter_starts_with_ci(self, column: E::Column, prefix: &str) -> Self;
}

impl<E> FilterStartsWithCi<E> for Select<E>
where
    E: EntityTrait,
{
    fn filter_starts_with_ci(self, column: E::Column, prefix: &str) -> Self {
        let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
        self.filter(
            Expr::expr(Func::lower(Expr::col((E::default(), column))))
                .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
        )
    }
}
