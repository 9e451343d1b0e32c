use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user with their saved books
    #[graphql(guard = "AuthGuard")]
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let user = db
            .users()
            .get_by_id(&auth.user_id)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| AppError::not_found("No user found with this id").extend())?;

        Ok(user.into())
    }
}
