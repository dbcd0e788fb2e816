//! Navigation cards for the storefront home page.

use serde::Serialize;
use url::Url;

use crate::link::join_url;

/// Path appended to the WordPress base URL for the WooCommerce account page.
pub const ACCOUNT_PATH: &str = "/my-account";

/// Source repository of the storefront.
pub const SOURCE_REPOSITORY_URL: &str = "https://github.com/brijr/next-woo";

/// One-click deployment link for the storefront.
pub const DEPLOY_URL: &str = "https://vercel.com/new/clone?repository-url=https%3A%2F%2Fgithub.com%2Fbrijr%2Fnext-woo&env=WORDPRESS_URL,WORDPRESS_HOSTNAME,WORDPRESS_WEBHOOK_SECRET,WC_CONSUMER_KEY,WC_CONSUMER_SECRET&envDescription=WordPress%20URL%2C%20hostname%20for%20images%2C%20webhook%20secret%2C%20and%20WooCommerce%20API%20credentials&project-name=next-woo&repository-name=next-woo&demo-title=Next.js%20WooCommerce%20Starter&demo-url=https%3A%2F%2Fnext-woo.com";

/// Placeholder href for a destination that could not be resolved.
pub const UNCONFIGURED_HREF: &str = "#account-unavailable";

/// Glyph shown on a navigation card.
///
/// The presentation layer maps the name to artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    ShoppingBag,
    ShoppingCart,
    CreditCard,
    User,
    Tag,
    Pen,
    Layers,
    Folder,
}

impl Icon {
    /// Stable identifier, e.g. `shopping-bag`.
    pub fn name(self) -> &'static str {
        match self {
            Icon::ShoppingBag => "shopping-bag",
            Icon::ShoppingCart => "shopping-cart",
            Icon::CreditCard => "credit-card",
            Icon::User => "user",
            Icon::Tag => "tag",
            Icon::Pen => "pen",
            Icon::Layers => "layers",
            Icon::Folder => "folder",
        }
    }
}

/// Where a navigation card points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Site route, always starting with `/`
    Internal(&'static str),

    /// Absolute URL on another origin
    External(Url),

    /// The destination depends on configuration that is missing or invalid
    Unconfigured {
        /// Why the destination could not be built
        reason: String,
    },
}

impl Destination {
    /// The href to link to. Never empty.
    pub fn href(&self) -> &str {
        match self {
            Destination::Internal(path) => path,
            Destination::External(url) => url.as_str(),
            Destination::Unconfigured { .. } => UNCONFIGURED_HREF,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Destination::External(_))
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Destination::Unconfigured { .. })
    }
}

/// A single card on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Card title
    pub label: &'static str,

    /// Secondary line under the title
    pub description: &'static str,

    /// Link target
    pub destination: Destination,

    /// Glyph identifier
    pub icon: Icon,
}

impl NavigationEntry {
    fn internal(
        label: &'static str,
        description: &'static str,
        path: &'static str,
        icon: Icon,
    ) -> Self {
        Self {
            label,
            description,
            destination: Destination::Internal(path),
            icon,
        }
    }

    pub fn href(&self) -> &str {
        self.destination.href()
    }

    pub fn is_external(&self) -> bool {
        self.destination.is_external()
    }
}

impl Serialize for NavigationEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("NavigationEntry", 6)?;
        state.serialize_field("label", self.label)?;
        state.serialize_field("description", self.description)?;
        state.serialize_field("href", self.href())?;
        state.serialize_field("icon", &self.icon)?;
        state.serialize_field("is_external", &self.is_external())?;
        state.serialize_field("is_configured", &self.destination.is_configured())?;
        state.end()
    }
}

/// Build the home page cards in display order.
///
/// The My Account card links into WooCommerce on the WordPress host given by
/// `account_base_url`. When that is absent, blank or not a valid absolute
/// URL, the card is kept with an [`Destination::Unconfigured`] destination and
/// a warning is logged.
pub fn build_navigation_entries(account_base_url: Option<&str>) -> Vec<NavigationEntry> {
    vec![
        NavigationEntry::internal("Shop", "Browse all products", "/shop", Icon::ShoppingBag),
        NavigationEntry::internal("Cart", "View your shopping cart", "/cart", Icon::ShoppingCart),
        NavigationEntry::internal(
            "Checkout",
            "Complete your purchase",
            "/checkout",
            Icon::CreditCard,
        ),
        NavigationEntry {
            label: "My Account",
            description: "Login, orders, and settings",
            destination: account_destination(account_base_url),
            icon: Icon::User,
        },
        NavigationEntry::internal(
            "Categories",
            "Browse by category",
            "/posts/categories",
            Icon::Tag,
        ),
        NavigationEntry::internal("Blog", "Read our latest posts", "/posts", Icon::Pen),
        NavigationEntry::internal("Pages", "Static content pages", "/pages", Icon::Layers),
        NavigationEntry {
            label: "GitHub",
            description: "View source code",
            destination: external(SOURCE_REPOSITORY_URL),
            icon: Icon::Folder,
        },
    ]
}

fn account_destination(base: Option<&str>) -> Destination {
    let Some(base) = base.filter(|b| !b.trim().is_empty()) else {
        tracing::warn!("WordPress URL is not configured; account link disabled");
        return Destination::Unconfigured {
            reason: "WordPress URL is not configured".to_string(),
        };
    };

    match join_url(base, ACCOUNT_PATH) {
        Ok(url) => Destination::External(url),
        Err(e) => {
            tracing::warn!("Cannot build account link from '{}': {}", base, e);
            Destination::Unconfigured {
                reason: e.to_string(),
            }
        }
    }
}

fn external(literal: &str) -> Destination {
    match Url::parse(literal) {
        Ok(url) => Destination::External(url),
        Err(e) => Destination::Unconfigured {
            reason: e.to_string(),
        },
    }
}
