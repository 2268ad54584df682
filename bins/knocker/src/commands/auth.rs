//! Sign-in and account commands

use super::{emit, ensure_valid};
use crate::context::Context;
use anyhow::Result;
use knocker_api_client::format::{format_date, relative_time};
use knocker_api_client::forms::{validate_login, validate_register};
use knocker_api_client::loaders::load_home;
use knocker_cli::Status;
use serde_json::json;

pub async fn login(ctx: &Context) -> Result<()> {
    let (email, password) = ctx.credentials()?;
    ensure_valid(validate_login(email, password))?;

    let message = ctx
        .spin("Signing in", ctx.client.auth().login(email, password))
        .await?;
    emit(ctx, &json!({ "message": message }), |_| Status::success(&message))
}

pub async fn register(ctx: &Context, display_name: &str) -> Result<()> {
    let (email, password) = ctx.credentials()?;
    ensure_valid(validate_register(display_name, email, password))?;

    let message = ctx
        .spin(
            "Creating account",
            ctx.client.auth().register(display_name.trim(), email.trim(), password),
        )
        .await?;
    emit(ctx, &json!({ "message": message }), |_| Status::success(&message))
}

pub fn oauth_url(ctx: &Context, provider: &str, next: Option<&str>) -> Result<()> {
    let url = ctx.client.auth().oauth_url(provider, next);
    emit(ctx, &json!({ "url": url }), |_| println!("{url}"))
}

pub async fn me(ctx: &Context) -> Result<()> {
    ctx.authenticate("/").await?;
    let user = ctx.spin("Fetching profile", ctx.client.users().me()).await?;

    emit(ctx, &user, |user| {
        Status::header(&user.display_name);
        Status::field("ID", &user.id);
        if let Some(avatar) = &user.avatar {
            Status::field("Avatar", avatar);
        }
        Status::field(
            "Member since",
            &format!(
                "{} ({})",
                format_date(&user.created_at),
                relative_time(Some(&user.created_at), chrono::Utc::now())
            ),
        );
    })
}

pub async fn home(ctx: &Context) -> Result<()> {
    ctx.authenticate("/").await?;
    let target = ctx.spin("Fetching teams", load_home(&ctx.client)).await?;

    emit(ctx, &target, |target| println!("{}", target.path()))
}
