use threeyd::{ApiError, ThreeYourMindClient, Transport};
use threeyd_core::BasketId;

/// A basket that only exists for the duration of an import.
///
/// Call [`ScratchBasket::release`] on every path out of the import. Dropping
/// an unreleased basket cannot delete it (there is no async drop), so it is
/// logged as leaked.
#[derive(Debug)]
pub struct ScratchBasket<'a, T: Transport> {
    client: &'a ThreeYourMindClient<T>,
    id: BasketId,
    released: bool,
}

impl<'a, T: Transport> ScratchBasket<'a, T> {
    /// Create a new empty basket.
    ///
    /// # Errors
    ///
    /// Returns error if the basket cannot be created.
    pub async fn acquire(client: &'a ThreeYourMindClient<T>) -> Result<Self, ApiError> {
        let basket = client.user_panel().create_basket().await?;
        tracing::debug!(basket_id = %basket.id, "Scratch basket created");
        Ok(Self {
            client,
            id: basket.id,
            released: false,
        })
    }

    #[must_use]
    pub const fn id(&self) -> BasketId {
        self.id
    }

    /// Delete the basket.
    ///
    /// # Errors
    ///
    /// Returns error if the delete request fails. The basket counts as
    /// released either way.
    pub async fn release(mut self) -> Result<(), ApiError> {
        self.released = true;
        self.client.user_panel().delete_basket(self.id).await?;
        tracing::debug!(basket_id = %self.id, "Scratch basket deleted");
        Ok(())
    }
}

impl<T: Transport> Drop for ScratchBasket<'_, T> {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(basket_id = %self.id, "Scratch basket was not deleted");
        }
    }
}
