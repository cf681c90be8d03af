/// Assert two values are fuzzy equal, panicking with both values on failure.
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        #[allow(unused_imports)]
        use $crate::num::*;
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        #[allow(unused_imports)]
        use $crate::num::*;
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
   eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Construct an open [Polyline](crate::polyline::Polyline) from `(x, y, bulge)` tuples.
///
/// # Examples
///
/// ```
/// # use arcline::polyline_open;
/// # use arcline::polyline::*;
/// let pline = polyline_open![(0.0, 1.0, 1.0), (2.0, 0.0, 0.0)];
/// assert!(!pline.is_closed());
/// assert_eq!(pline[0], Vertex::new(0.0, 1.0, 1.0));
/// assert_eq!(pline[1], Vertex::new(2.0, 0.0, 0.0));
/// ```
#[macro_export]
macro_rules! polyline_open {
    ($( $v:expr ),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut pl = $crate::polyline::Polyline::new();
            $(
                pl.add($v.0, $v.1, $v.2);
            )*
            pl
        }
    };
}

/// Construct a closed [Polyline](crate::polyline::Polyline) from `(x, y, bulge)` tuples.
///
/// # Examples
///
/// ```
/// # use arcline::polyline_closed;
/// # use arcline::polyline::*;
/// let pline = polyline_closed![(0.0, 1.0, 1.0), (2.0, 0.0, 0.0)];
/// assert!(pline.is_closed());
/// ```
#[macro_export]
macro_rules! polyline_closed {
    ($( $v:expr ),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut pl = $crate::polyline::Polyline::new_closed();
            $(
                pl.add($v.0, $v.1, $v.2);
            )*
            pl
        }
    };
}
