use numarray::{DType, Kernel, KernelConfig, NumericArray};

fn main() {
    env_logger::init();

    let a = NumericArray::from_values([[1, 2], [3, 4]], DType::Float64)
        .expect("failed to create first array");
    let b = NumericArray::from_values([[5, 6], [7, 8]], DType::Float64)
        .expect("failed to create second array");

    println!("Array A:\n{}", a);
    println!("Array B:\n{}", b);
    println!("A + B:\n{}", (&a + &b).expect("shapes match"));
    println!("A @ B:\n{}", a.matmul(&b).expect("inner dimensions match"));
    println!("det(A) = {:.3}", a.determinant().expect("A is square"));
    println!("inv(A):\n{:.3}", a.inverse().expect("A is invertible"));

    // same product, forced onto the parallel path
    let kernel = Kernel::new(KernelConfig {
        parallel_threshold: 0,
        ..KernelConfig::default()
    });
    println!("A @ B (parallel):\n{}", kernel.matmul(&a, &b).expect("inner dimensions match"));
}
