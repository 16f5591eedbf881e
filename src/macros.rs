//! The `record!` declaration macro.

/// Declares a mapped record type: the struct, its [`Record`] impl, and
/// its [`FromRow`] impl, all generated from one field list so column
/// order and binding order cannot diverge.
///
/// Fields with `=> "column"` are mapped, in declaration order. Fields
/// without one are skipped: absent from SQL in both directions and
/// rebuilt with `Default::default()` when a row is bound.
///
/// Mapped field types must be `Clone + Into<Value> + FromValue`;
/// skipped field types must be `Default`.
///
/// ```
/// rowmap::record! {
///     table = "feeds",
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Feed {
///         pub id: i64 => "id",
///         pub url: String => "url",
///         pub attempts: Vec<String>,
///     }
/// }
///
/// use rowmap::Record;
/// assert_eq!(Feed::TABLE, "feeds");
/// assert_eq!(Feed::COLUMNS, &["id", "url"]);
/// ```
///
/// [`Record`]: crate::record::Record
/// [`FromRow`]: crate::record::FromRow
#[macro_export]
macro_rules! record {
    (
        table = $table:literal,
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($fields:tt)*
        }
    ) => {
        $crate::record!(@munch
            table = $table,
            meta = [$(#[$meta])*],
            vis = [$vis],
            name = $name,
            all = [],
            mapped = [],
            skipped = [],
            rest = [$($fields)*]
        );
    };

    // Mapped field: `name: Type => "column"`.
    (@munch
        table = $table:literal,
        meta = [$($meta:tt)*],
        vis = [$vis:vis],
        name = $name:ident,
        all = [$($all:tt)*],
        mapped = [$($mapped:tt)*],
        skipped = [$($skipped:tt)*],
        rest = [
            $(#[$fmeta:meta])*
            $fvis:vis $fname:ident : $fty:ty => $col:literal
            $(, $($rest:tt)*)?
        ]
    ) => {
        $crate::record!(@munch
            table = $table,
            meta = [$($meta)*],
            vis = [$vis],
            name = $name,
            all = [$($all)* { $(#[$fmeta])* $fvis $fname : $fty }],
            mapped = [$($mapped)* { $fname : $fty => $col }],
            skipped = [$($skipped)*],
            rest = [$($($rest)*)?]
        );
    };

    // Skipped field: no column mapping.
    (@munch
        table = $table:literal,
        meta = [$($meta:tt)*],
        vis = [$vis:vis],
        name = $name:ident,
        all = [$($all:tt)*],
        mapped = [$($mapped:tt)*],
        skipped = [$($skipped:tt)*],
        rest = [
            $(#[$fmeta:meta])*
            $fvis:vis $fname:ident : $fty:ty
            $(, $($rest:tt)*)?
        ]
    ) => {
        $crate::record!(@munch
            table = $table,
            meta = [$($meta)*],
            vis = [$vis],
            name = $name,
            all = [$($all)* { $(#[$fmeta])* $fvis $fname : $fty }],
            mapped = [$($mapped)*],
            skipped = [$($skipped)* { $fname : $fty }],
            rest = [$($($rest)*)?]
        );
    };

    // Every field consumed: emit the struct and both impls.
    (@munch
        table = $table:literal,
        meta = [$($meta:tt)*],
        vis = [$vis:vis],
        name = $name:ident,
        all = [$({ $(#[$ameta:meta])* $avis:vis $aname:ident : $aty:ty })*],
        mapped = [$({ $mname:ident : $mty:ty => $mcol:literal })*],
        skipped = [$({ $sname:ident : $sty:ty })*],
        rest = []
    ) => {
        $($meta)*
        $vis struct $name {
            $(
                $(#[$ameta])*
                $avis $aname : $aty,
            )*
        }

        impl $crate::record::Record for $name {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &[$($mcol),*];

            fn values(&self) -> ::std::vec::Vec<$crate::value::Value> {
                ::std::vec![
                    $($crate::value::Value::from(::core::clone::Clone::clone(&self.$mname))),*
                ]
            }
        }

        impl $crate::record::FromRow for $name {
            fn from_row(
                row: &$crate::record::Row,
            ) -> ::core::result::Result<Self, $crate::errors::MapError> {
                #[allow(unused_mut, unused_variables)]
                let mut cursor = row.cursor::<Self>();
                ::core::result::Result::Ok(Self {
                    $($mname : cursor.take()?,)*
                    $($sname : ::core::default::Default::default(),)*
                })
            }
        }
    };
}
