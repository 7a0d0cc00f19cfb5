use rmlp::prelude::*;

fn main() -> Result<()> {
    // 2-bit XOR as four labeled column vectors, targets one-hot over the
    // two classes.
    let inputs = [[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
    let labels = [0usize, 1, 1, 0];

    let mut samples: Vec<(Array2<f64>, Array2<f64>)> = inputs
        .iter()
        .zip(labels.iter())
        .map(|(x, &label)| Ok((column(x), to_categorical(label, 2)?)))
        .collect::<Result<_>>()?;

    let mut model = Network::random_seeded(&[2, 4, 2], 42)?;
    model.summary();

    for epoch in 0..2000u64 {
        shuffle_seeded(&mut samples, epoch);
        model = model.train(&samples, 0.5)?;
    }

    println!("\nmean loss: {}", model.evaluate(&samples)?);
    println!("accuracy: {}", model.accuracy(&samples)?);
    for (input, target) in &samples {
        let output = model.predict(input)?;
        println!(
            "{:?} -> class {} (target {})",
            input.iter().collect::<Vec<_>>(),
            argmax(&output),
            argmax(target)
        );
    }

    model.save("./xor.model")?;
    let restored = Network::load("./xor.model")?;
    println!("binary round-trip identical: {}", restored == model);

    model.save_text("./xor.model.txt")?;
    let restored = Network::load_text("./xor.model.txt")?;
    println!("text round-trip mean loss: {}", restored.evaluate(&samples)?);

    Ok(())
}
