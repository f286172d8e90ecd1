//! [`Assembler`](crate::Assembler) implementations for standard types.
//!
//! | Category        | Types                                                  |
//! |-----------------|--------------------------------------------------------|
//! | arithmetic      | `bool`, `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64` |
//! | string          | `String`                                               |
//! | optional        | `Option<T>`                                            |
//! | sequence        | `Vec<T>`, `VecDeque<T>`                                |
//! | map             | `BTreeMap<K, V>`, `std` and `hashbrown` `HashMap<K, V, S>` |
//! | tuple           | arity 1 to 12                                          |
//! | box             | `Box<T>`                                               |
//!
//! Enums are implemented by `#[derive(AssembleEnum)]`, see
//! [`enumeration`](crate::enumeration).

mod boxed;
mod map;
mod option;
mod primitive;
mod sequence;
mod string;
mod tuple;
