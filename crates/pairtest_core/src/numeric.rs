//! Numeric helpers: n-dimensional array views, absolute-tolerance closeness, and `%g` formatting.
//!
//! ## Notes
//!
//! - Arrays are canonicalized to `f64` in row-major order. Integer inputs compare against float inputs after
//!   conversion.
//! - Nested inputs (`Vec<Vec<T>>`, `[[T; M]; N]`) stack into n-dimensional arrays. Every row must have the same
//!   shape, otherwise the conversion fails with [`RaggedArray`].

use core::fmt;

/// The shape of an array, outermost dimension first. Scalars have an empty shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn scalar() -> Self {
        Shape(Vec::new())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of elements an array of this shape holds.
    pub fn len(&self) -> usize {
        self.0.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    /// Tuple-style rendering: `()`, `(2,)`, `(2, 3)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("()"),
            [only] => write!(f, "({only},)"),
            dims => {
                f.write_str("(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{d}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A dense row-major array of `f64`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NdArray {
    shape: Shape,
    data: Vec<f64>,
}

impl NdArray {
    /// Build an array from a shape and row-major data. Returns `None` if the lengths disagree.
    pub fn from_parts(shape: Shape, data: Vec<f64>) -> Option<Self> {
        (shape.len() == data.len()).then_some(Self { shape, data })
    }

    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Shape::scalar(),
            data: vec![value],
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Stack equally-shaped rows along a new leading axis.
    fn stack(rows: Vec<NdArray>) -> Result<Self, RaggedArray> {
        let mut rows = rows.into_iter();
        let Some(first) = rows.next() else {
            return Ok(Self {
                shape: Shape(vec![0]),
                data: Vec::new(),
            });
        };

        let row_shape = first.shape.clone();
        let mut count = 1;
        let mut data = first.data;
        for row in rows {
            if row.shape != row_shape {
                return Err(RaggedArray {
                    expected: row_shape,
                    found: row.shape,
                });
            }
            data.extend(row.data);
            count += 1;
        }

        let mut dims = Vec::with_capacity(row_shape.0.len() + 1);
        dims.push(count);
        dims.extend(row_shape.0);
        Ok(Self { shape: Shape(dims), data })
    }
}

/// A nested input whose rows do not share one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaggedArray {
    pub expected: Shape,
    pub found: Shape,
}

impl fmt::Display for RaggedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ragged (row {} after {})", self.found, self.expected)
    }
}

impl std::error::Error for RaggedArray {}

mod sealed {
    /// Sealing trait to restrict scalar element types to the builtin numerics.
    pub trait Sealed {}
}

/// A builtin numeric scalar that converts losslessly enough to `f64` for comparison.
pub trait Scalar: sealed::Sealed + Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }

            impl ToNdArray for $ty {
                fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
                    Ok(NdArray::scalar(Scalar::to_f64(*self)))
                }
            }
        )*
    };
}

impl_scalar!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Convert a value into a dense [`NdArray`].
pub trait ToNdArray {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray>;
}

impl ToNdArray for NdArray {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
        Ok(self.clone())
    }
}

impl<T: ToNdArray> ToNdArray for [T] {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
        let rows = self.iter().map(ToNdArray::to_ndarray).collect::<Result<Vec<_>, _>>()?;
        NdArray::stack(rows)
    }
}

impl<T: ToNdArray> ToNdArray for Vec<T> {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
        self.as_slice().to_ndarray()
    }
}

impl<T: ToNdArray, const N: usize> ToNdArray for [T; N] {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
        self.as_slice().to_ndarray()
    }
}

impl<T: ToNdArray + ?Sized> ToNdArray for &T {
    fn to_ndarray(&self) -> Result<NdArray, RaggedArray> {
        (**self).to_ndarray()
    }
}

/// Check element-wise closeness with a purely absolute tolerance.
///
/// ## Returns
/// - (`bool`): `true` iff the data lengths match and every pair satisfies `|a - b| <= atol`. Equal infinities are
///   close; `NaN` is never close to anything.
///
/// ## Notes
/// - Shapes are not compared here; callers check them first so a mismatch can be reported separately.
/// - The bound carries one ulp of slack at the operands' magnitude, capped at a millionth of `atol`, so `2.0` and the
///   literal `2.0000000001` are close at `1e-10` even though their `f64` difference is slightly above it. The slack
///   never grows past the tolerance itself, and `atol == 0.0` means exact equality.
pub fn all_close_abs(computed: &[f64], reference: &[f64], atol: f64) -> bool {
    computed.len() == reference.len() && computed.iter().zip(reference).all(|(&a, &b)| close_abs(a, b, atol))
}

fn close_abs(a: f64, b: f64, atol: f64) -> bool {
    if a == b {
        return true;
    }
    if !(a.is_finite() && b.is_finite()) {
        return false;
    }
    let slack = (f64::EPSILON * a.abs().max(b.abs())).min(atol * 1e-6);
    (a - b).abs() <= atol + slack
}

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Format a float like C's `%.<precision>g`.
///
/// ## Examples
/// ```rust
/// use pairtest_core::numeric::format_general;
/// assert_eq!(format_general(0.012, 3), "0.012");
/// assert_eq!(format_general(1.5, 3), "1.5");
/// assert_eq!(format_general(0.0, 3), "0");
/// assert_eq!(format_general(1234.5, 3), "1.23e+03");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let precision = precision.max(1);
    // Round to the requested significant figures first; the exponent can shift (999.6 -> 1.00e3).
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_trailing_zeros(&mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
