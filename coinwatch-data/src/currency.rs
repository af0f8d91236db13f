use derive_more::Display;

/// Display currencies every asset is quoted in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub enum Currency {
    #[display("BTC")]
    Btc,
    #[display("USD")]
    Usd,
    #[display("AUD")]
    Aud,
}

impl Currency {
    /// Fetch order used for both the listings and the quotes calls.
    pub const ALL: [Currency; 3] = [Currency::Btc, Currency::Usd, Currency::Aud];

    /// Currency code as used by the provider's `convert` parameter and `quote` keys.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Btc => "BTC",
            Currency::Usd => "USD",
            Currency::Aud => "AUD",
        }
    }
}

/// One value per [`Currency`].
///
/// Every currency slot is always populated, so a `ByCurrency<T>` can never be partial.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ByCurrency<T> {
    pub btc: T,
    pub usd: T,
    pub aud: T,
}

impl<T> ByCurrency<T> {
    pub fn get(&self, currency: Currency) -> &T {
        match currency {
            Currency::Btc => &self.btc,
            Currency::Usd => &self.usd,
            Currency::Aud => &self.aud,
        }
    }

    /// Iterate `(Currency, &T)` pairs in [`Currency::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &T)> {
        Currency::ALL
            .into_iter()
            .map(move |currency| (currency, self.get(currency)))
    }
}
