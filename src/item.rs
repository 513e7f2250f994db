//! # Produced elements: [`Item`] and the classification rule.
//!
//! Every successful [`Pull::next`](crate::Pull::next) returns an [`Item`]: either a value or an
//! in-band error. Raw elements are turned into items through [`Classify`]:
//!
//! - error-typed inputs ([`BoxError`], `Box<dyn Error + Send + Sync>`, [`std::io::Error`],
//!   [`IterError`], the `Err` side of a [`Result`]) become [`Item::Error`];
//! - anything else becomes [`Item::Value`].
//!
//! An in-band error is a successful production. It is not a terminal signal. Only the `Err` side
//! of `next` ends iteration.
//!
//! ## Example
//! ```
//! use pullsource::{classify, Item};
//!
//! let v = classify(42_i32);
//! assert!(v.is_value());
//!
//! let e = classify(std::io::Error::other("boom"));
//! assert!(e.is_error());
//! ```

use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::error::IterError;

/// Shared, type-erased error carried by [`Item::Error`].
pub type BoxError = Arc<dyn Error + Send + Sync + 'static>;

/// A produced element: exactly one of a value or an in-band error.
#[derive(Clone)]
pub enum Item<T> {
    /// A regular element.
    Value(T),
    /// An element that classified as an error.
    Error(BoxError),
}

impl<T> Item<T> {
    /// Returns `true` for [`Item::Value`].
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, Item::Value(_))
    }

    /// Returns `true` for [`Item::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Item::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Item::Value(v) => Some(v),
            Item::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&BoxError> {
        match self {
            Item::Value(_) => None,
            Item::Error(e) => Some(e),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Item::Value(v) => Some(v),
            Item::Error(_) => None,
        }
    }

    /// Converts into a standard [`Result`], the error side holding the in-band error.
    pub fn into_result(self) -> Result<T, BoxError> {
        match self {
            Item::Value(v) => Ok(v),
            Item::Error(e) => Err(e),
        }
    }

    /// Maps the value case, leaving an error untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Item<U> {
        match self {
            Item::Value(v) => Item::Value(f(v)),
            Item::Error(e) => Item::Error(e),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Item::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
        }
    }
}

/// Classification rule turning a raw element into an [`Item`].
///
/// Implemented for common value types, for error types, and for [`Result`]. Element types of a
/// channel or slice source must implement it.
///
/// A type of your own can implement `Classify` directly, or be carried as [`Plain<T>`],
/// `Result<T, E>` or `Item<T>` without any impl:
///
/// ```
/// use tokio_util::sync::CancellationToken;
/// use pullsource::{from_slice, Plain, Pull};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Order { id: u32 }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let orders = [Plain(Order { id: 1 })];
/// let mut src = from_slice(&orders);
/// let item = src.next(&CancellationToken::new()).await.unwrap();
/// assert_eq!(item.into_value(), Some(Order { id: 1 }));
/// # }
/// ```
pub trait Classify {
    /// Type carried by [`Item::Value`].
    type Value;

    /// Tags `self` as a value or an error.
    fn classify(self) -> Item<Self::Value>;
}

/// Classifies `raw` into an [`Item`].
#[inline]
pub fn classify<R: Classify>(raw: R) -> Item<R::Value> {
    raw.classify()
}

impl<T> Classify for Item<T> {
    type Value = T;

    fn classify(self) -> Item<T> {
        self
    }
}

/// Marks an element of any type as a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Plain<T>(pub T);

impl<T> Classify for Plain<T> {
    type Value = T;

    #[inline]
    fn classify(self) -> Item<T> {
        Item::Value(self.0)
    }
}

impl<T, E> Classify for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    type Value = T;

    fn classify(self) -> Item<T> {
        match self {
            Ok(v) => Item::Value(v),
            Err(e) => Item::Error(Arc::new(e)),
        }
    }
}

impl Classify for BoxError {
    type Value = Infallible;

    fn classify(self) -> Item<Infallible> {
        Item::Error(self)
    }
}

impl Classify for Box<dyn Error + Send + Sync + 'static> {
    type Value = Infallible;

    fn classify(self) -> Item<Infallible> {
        Item::Error(Arc::from(self))
    }
}

macro_rules! classify_as_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Classify for $ty {
                type Value = Infallible;

                fn classify(self) -> Item<Infallible> {
                    Item::Error(Arc::new(self))
                }
            }
        )*
    };
}

classify_as_error!(std::io::Error, IterError, std::fmt::Error);

macro_rules! classify_as_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Classify for $ty {
                type Value = $ty;

                #[inline]
                fn classify(self) -> Item<$ty> {
                    Item::Value(self)
                }
            }
        )*
    };
}

classify_as_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    Arc<str>,
    std::time::Duration,
);

impl<'a> Classify for &'a str {
    type Value = &'a str;

    fn classify(self) -> Item<&'a str> {
        Item::Value(self)
    }
}

impl<T> Classify for Vec<T> {
    type Value = Vec<T>;

    fn classify(self) -> Item<Vec<T>> {
        Item::Value(self)
    }
}

impl<T> Classify for Option<T> {
    type Value = Option<T>;

    fn classify(self) -> Item<Option<T>> {
        Item::Value(self)
    }
}
