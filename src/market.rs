//! # Market Data
//!
//! $$
//! \{(t, P_t)\}_{\text{ticker}} \mapsto \text{aligned close-price panel}
//! $$
//!
//! Price series containers, inner-join date alignment and the Yahoo Finance
//! history fetcher (feature `yahoo`).

pub mod panel;
#[cfg(feature = "yahoo")]
pub mod yahoo;

pub use panel::PricePanel;
pub use panel::PriceSeries;
pub use panel::align_panel;
