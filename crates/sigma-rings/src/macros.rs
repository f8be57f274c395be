//! Operator boilerplate for the newtype rings.

/// Implements `+`, `-`, `*`, unary `-` and `Display` for a single-field
/// newtype by forwarding to the wrapped value, plus `From` for the wrapped
/// type and each listed `source => conversion` pair.
macro_rules! newtype_ring_ops {
    ($ring:ident($inner:ty) $(, $src:ty => $conv:expr)* $(,)?) => {
        impl std::ops::Add for $ring {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $ring {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl std::ops::Mul for $ring {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl std::ops::Neg for $ring {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl std::fmt::Display for $ring {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $ring {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        $(
            impl From<$src> for $ring {
                fn from(value: $src) -> Self {
                    Self(($conv)(value))
                }
            }
        )*
    };
}

pub(crate) use newtype_ring_ops;
