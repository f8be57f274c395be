//! Operator and serde forwarding for the `dashu` newtypes.

/// Implements `std::ops::$trait` for every owned/borrowed pairing of a
/// single-field newtype, delegating to the wrapped value.
macro_rules! forward_binop {
    ($ty:ident: $($trait:ident::$method:ident),+ $(,)?) => {$(
        impl std::ops::$trait for $ty {
            type Output = $ty;

            fn $method(self, rhs: $ty) -> $ty {
                $ty(std::ops::$trait::$method(self.0, rhs.0))
            }
        }

        impl std::ops::$trait<&$ty> for $ty {
            type Output = $ty;

            fn $method(self, rhs: &$ty) -> $ty {
                $ty(std::ops::$trait::$method(self.0, &rhs.0))
            }
        }

        impl std::ops::$trait<$ty> for &$ty {
            type Output = $ty;

            fn $method(self, rhs: $ty) -> $ty {
                $ty(std::ops::$trait::$method(&self.0, rhs.0))
            }
        }

        impl std::ops::$trait for &$ty {
            type Output = $ty;

            fn $method(self, rhs: &$ty) -> $ty {
                $ty(std::ops::$trait::$method(&self.0, &rhs.0))
            }
        }
    )+};
}

/// Implements unary minus for a newtype and a reference to it.
macro_rules! forward_neg {
    ($ty:ident) => {
        impl std::ops::Neg for $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $ty(-self.0)
            }
        }

        impl std::ops::Neg for &$ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $ty(-&self.0)
            }
        }
    };
}

/// Serializes through the decimal `Display` form and deserializes through
/// `FromStr`, so archives do not depend on the limb layout.
macro_rules! serde_as_decimal {
    ($ty:ident) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use {forward_binop, forward_neg, serde_as_decimal};
