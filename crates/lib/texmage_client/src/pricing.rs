//! Credit plans shown on the pricing view. Display only; there is no
//! purchase endpoint.

/// A purchasable credit bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: &'static str,
    pub price_usd: u32,
    pub credits: u32,
    pub description: &'static str,
}

pub const PLANS: [Plan; 3] = [
    Plan {
        id: "Basic",
        price_usd: 10,
        credits: 100,
        description: "Best for personal use.",
    },
    Plan {
        id: "Advanced",
        price_usd: 50,
        credits: 500,
        description: "Best for business use.",
    },
    Plan {
        id: "Business",
        price_usd: 250,
        credits: 5000,
        description: "Best for enterprise use.",
    },
];
