use std::ops::Range;

/// A pair of T and its location in template text
pub type Spanned<T> = (T, Span);

/// A half-open byte range locating a tag or diagnostic in template text
pub type Span = Range<usize>;
