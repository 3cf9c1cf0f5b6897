//! Generation gateway: credit-metered calls to the image provider.

use texmage_core::generation::{ImageProvider, to_data_uri};
use texmage_core::store::CredentialStore;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::GenerateImageResponse;

/// Generate an image for `user_id`, charging one credit on success.
///
/// Order: resolve the user and prompt, refuse at zero balance without
/// calling the provider, call the provider once, then atomically consume a
/// credit. A provider failure leaves the balance untouched. If a concurrent
/// request spent the last credit while the provider was running, the image
/// is discarded and the call fails with `NoCredits`.
pub async fn generate_image(
    store: &dyn CredentialStore,
    provider: &dyn ImageProvider,
    user_id: &str,
    prompt: Option<&str>,
) -> AppResult<GenerateImageResponse> {
    let user = store.find_by_id(user_id).await?;
    let (Some(user), Some(prompt)) = (user, prompt.filter(|p| !p.trim().is_empty())) else {
        return Err(AppError::MissingInput);
    };

    if user.credit_balance <= 0 {
        info!(user_id = %user.id, balance = user.credit_balance, "generation refused: no credits");
        return Err(AppError::NoCredits {
            balance: user.credit_balance,
        });
    }

    let png = provider.generate(prompt).await.map_err(|e| {
        warn!(user_id = %user.id, error = %e, "provider call failed");
        AppError::from(e)
    })?;
    let result_image = to_data_uri(&png);

    let Some(credit_balance) = store.consume_credit(&user.id).await? else {
        warn!(user_id = %user.id, "credit exhausted during generation");
        return Err(AppError::NoCredits { balance: 0 });
    };
    info!(user_id = %user.id, balance = credit_balance, "image generated");

    Ok(GenerateImageResponse {
        success: true,
        message: "Image generated".into(),
        credit_balance,
        result_image,
    })
}
