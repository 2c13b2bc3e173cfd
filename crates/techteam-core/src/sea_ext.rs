use sea_orm::{
    ColumnTrait, IntoSimpleExpr,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

const LIKE_ESCAPE: char = '!';

/// Case-insensitive substring match: `LOWER(column) LIKE '%needle%'`.
///
/// Works on both Postgres and SQLite, unlike `ILIKE`. `%` and `_` in the
/// needle match literally.
pub fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(column.into_simple_expr()))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
