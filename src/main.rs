use nnfs::{broadcast, Dense, Tensor, TensorError};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), TensorError> {
    init_logging();

    println!("=== Tensors ===\n");

    let mut scalar = Tensor::<i32>::with_value(1)?;
    scalar.set(&[], 10)?;
    println!("{}", scalar);

    let vector = Tensor::<u32>::with_value(vec![1u32, 2, 3, 4, 5])?;
    println!("{}", vector);

    let cube = Tensor::<i32>::with_value(vec![
        vec![vec![1, 5, 6, 2], vec![3, 2, 1, 3]],
        vec![vec![1, 5, 6, 2], vec![3, 2, 1, 3]],
        vec![vec![1, 5, 6, 2], vec![3, 2, 1, 3]],
    ])?;
    println!("{}", cube);
    println!("transposed to {:?}", cube.transpose().shape());

    println!("\n=== Matrix multiplication ===\n");

    let m1 = Tensor::<i32>::with_value(vec![vec![1, 2, 3], vec![4, 5, 6]])?;
    let m2 = Tensor::<i32>::with_value(vec![vec![7, 8], vec![9, 10], vec![11, 12]])?;
    println!("{}", m1.matmul(&m2)?);

    println!("\n=== Broadcasting ===\n");

    let row = Tensor::<i32>::with_value(vec![1, 2, 3])?;
    let col = Tensor::<i32>::with_value(vec![vec![1], vec![2], vec![3]])?;
    let views = broadcast(&[&row, &col])?;
    let sum = views[0].to_tensor()?.add(&views[1].to_tensor()?)?;
    println!("{} + {} =\n{}", row, col, sum);

    println!("\n=== Dense layer ===\n");

    let layer = Dense::new(2, 3)?;
    let inputs = Tensor::<f64>::with_value(vec![vec![1.0, 2.0], vec![-1.5, 2.7], vec![3.3, -0.8]])?;
    let outputs = layer.forward(&inputs)?;
    println!("weights: {}", layer.weights());
    println!("outputs: {}", outputs);

    Ok(())
}
