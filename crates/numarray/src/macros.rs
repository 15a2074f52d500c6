/// Binds `$array` to the typed ndarray held by a [`Buffer`](crate::array::Buffer)
/// and evaluates `$body` once per element type.
macro_rules! dispatch {
    ($buffer:expr, $array:ident => $body:expr) => {
        match $buffer {
            $crate::array::Buffer::Int32($array) => $body,
            $crate::array::Buffer::Int64($array) => $body,
            $crate::array::Buffer::Float32($array) => $body,
            $crate::array::Buffer::Float64($array) => $body,
        }
    };
}

/// Evaluates `$body` with `$t` aliased to the Rust element type of `$dtype`.
macro_rules! with_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::dtype::DType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::dtype::DType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::dtype::DType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::dtype::DType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}
