//! Python-to-native value conversions
//!
//! Every conversion is recoverable: an absent or incompatible source yields
//! `None`, never an error or a panic. Numeric sources are ints, floats and
//! bools; integer targets truncate toward zero the way Python's own `int()`
//! coercion does.

use num_traits::NumCast;
use pyo3::prelude::*;
use pyo3::types::{PyList, PyString};

/// A native value readable out of a namelist object.
pub trait FromNamelist: Sized {
    fn from_py(obj: &PyAny) -> Option<Self>;
}

/// Convert a namelist object to a native value.
pub fn convert<T: FromNamelist>(obj: &PyAny) -> Option<T> {
    T::from_py(obj)
}

impl FromNamelist for bool {
    /// Python truthiness of any object, as the host's flag reads expect.
    fn from_py(obj: &PyAny) -> Option<Self> {
        obj.is_true().ok()
    }
}

impl FromNamelist for f64 {
    fn from_py(obj: &PyAny) -> Option<Self> {
        obj.extract::<f64>().ok()
    }
}

impl FromNamelist for f32 {
    fn from_py(obj: &PyAny) -> Option<Self> {
        obj.extract::<f64>().ok().map(|v| v as f32)
    }
}

macro_rules! integer_from_namelist {
    ($($ty:ty),* $(,)?) => {$(
        impl FromNamelist for $ty {
            fn from_py(obj: &PyAny) -> Option<Self> {
                if let Ok(v) = obj.extract::<i64>() {
                    return NumCast::from(v);
                }
                // Floats truncate toward zero; NaN and out-of-range values
                // are conversion failures, not panics.
                let v = obj.extract::<f64>().ok()?;
                NumCast::from(v.trunc())
            }
        }
    )*};
}

integer_from_namelist!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromNamelist for String {
    fn from_py(obj: &PyAny) -> Option<Self> {
        let s = obj.downcast::<PyString>().ok()?;
        s.to_str().ok().map(str::to_owned)
    }
}

impl<T: FromNamelist> FromNamelist for Vec<T> {
    /// The source must be a Python list and every element must convert.
    fn from_py(obj: &PyAny) -> Option<Self> {
        let list = obj.downcast::<PyList>().ok()?;
        let mut out = Vec::with_capacity(list.len());
        for item in list.iter() {
            out.push(T::from_py(item)?);
        }
        Some(out)
    }
}

/// Split a Python list into opaque element handles.
pub fn list_items(py: Python<'_>, obj: &PyAny) -> Option<Vec<Py<PyAny>>> {
    let list = obj.downcast::<PyList>().ok()?;
    Some(list.iter().map(|item| item.into_py(py)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime;

    fn eval<'py>(py: Python<'py>, expr: &str) -> &'py PyAny {
        py.eval(expr, None, None).unwrap()
    }

    #[test]
    fn numeric_conversions() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<f64>(eval(py, "2.5")), Some(2.5));
            assert_eq!(convert::<f64>(eval(py, "7")), Some(7.0));
            assert_eq!(convert::<i32>(eval(py, "7")), Some(7));
            assert_eq!(convert::<u32>(eval(py, "7")), Some(7));
        });
    }

    #[test]
    fn integers_truncate_toward_zero() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<i32>(eval(py, "3.9")), Some(3));
            assert_eq!(convert::<i32>(eval(py, "-3.9")), Some(-3));
        });
    }

    #[test]
    fn numeric_conversion_rejects_text() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<f64>(eval(py, "'3.5'")), None);
            assert_eq!(convert::<i32>(eval(py, "'3'")), None);
        });
    }

    #[test]
    fn integer_overflow_is_a_conversion_failure() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<u8>(eval(py, "300")), None);
            assert_eq!(convert::<u32>(eval(py, "-1")), None);
            assert_eq!(convert::<i64>(eval(py, "float('nan')")), None);
        });
    }

    #[test]
    fn string_conversion_requires_text() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<String>(eval(py, "'electron'")), Some("electron".to_string()));
            assert_eq!(convert::<String>(eval(py, "3.5")), None);
        });
    }

    #[test]
    fn truthiness_covers_any_object() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(convert::<bool>(eval(py, "True")), Some(true));
            assert_eq!(convert::<bool>(eval(py, "0")), Some(false));
            assert_eq!(convert::<bool>(eval(py, "[1]")), Some(true));
            assert_eq!(convert::<bool>(eval(py, "''")), Some(false));
        });
    }

    #[test]
    fn list_conversion_requires_every_element() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(
                convert::<Vec<f64>>(eval(py, "[1, 2.5, 3]")),
                Some(vec![1.0, 2.5, 3.0])
            );
            assert_eq!(convert::<Vec<f64>>(eval(py, "[1, 'two']")), None);
            // Tuples are not namelist lists.
            assert_eq!(convert::<Vec<f64>>(eval(py, "(1.0, 2.0)")), None);
        });
    }

    #[test]
    fn nested_lists_convert() {
        runtime::open();
        Python::with_gil(|py| {
            assert_eq!(
                convert::<Vec<Vec<i32>>>(eval(py, "[[1, 2], [3]]")),
                Some(vec![vec![1, 2], vec![3]])
            );
        });
    }

    #[test]
    fn list_items_yields_handles() {
        runtime::open();
        Python::with_gil(|py| {
            let items = list_items(py, eval(py, "[1.0, 'a']")).unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(convert::<f64>(items[0].as_ref(py)), Some(1.0));
            assert!(list_items(py, eval(py, "3.0")).is_none());
        });
    }
}
