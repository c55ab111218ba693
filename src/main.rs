use datagen::{
    generate_sample, generate_sequence, rand_matrix, update_seq_incr, DatagenConfig, MatrixBlock,
};

fn main() -> datagen::Result<()> {
    env_logger::init();

    println!("datagen {}: block-parallel random matrix generation", datagen::VERSION);

    let config = DatagenConfig::default().with_seed(7).with_block_size(500, 500);
    println!("\nConfiguration:");
    println!("  Threads: {}", config.system_params.n_threads);
    println!("  Block size: {}x{}", config.rows_per_block, config.cols_per_block);
    println!("  Seed: {:?}", config.seed);

    // Random matrices
    let cases: [(&str, usize, usize, f64, Option<&str>); 4] = [
        ("uniform", 2000, 2000, 0.8, None),
        ("uniform", 4000, 1000, 0.01, None),
        ("normal", 1500, 1500, 0.3, None),
        ("poisson", 1000, 3000, 0.5, Some("4")),
    ];
    println!("\nRandom matrices:");
    for (pdf, rows, cols, sparsity, params) in cases {
        let desc = config.descriptor(pdf, rows, cols, sparsity, 0.0, 1.0, params)?;
        let m = rand_matrix(&desc, &config)?;
        let density = m.nnz() as f64 / (rows as f64 * cols as f64);
        println!(
            "  {:>8} {:>5}x{:<5} target {:.3}  nnz {:>9}  density {:.4}  {}",
            pdf,
            rows,
            cols,
            sparsity,
            m.nnz(),
            density,
            if m.is_sparse() { "sparse" } else { "dense" }
        );
    }

    // Sequence
    let mut seq = MatrixBlock::new(0, 0, false);
    let incr = update_seq_incr(10.0, 1.0, 1.0);
    generate_sequence(&mut seq, 10.0, 1.0, incr)?;
    let values: Vec<f64> = (0..seq.n_rows()).map(|i| seq.get(i, 0)).collect();
    println!("\nSequence 10 -> 1: {:?}", values);

    // Sample
    let mut sample = MatrixBlock::new(0, 0, false);
    generate_sample(&mut sample, 100, 10, false, Some(42))?;
    let values: Vec<f64> = (0..sample.n_rows()).map(|i| sample.get(i, 0)).collect();
    println!("Sample of 10 from [1, 100]: {:?}", values);

    Ok(())
}
