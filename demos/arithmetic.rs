//! Generate random arithmetic expressions from a small CFG.
//!
//! Run with: cargo run --example arithmetic

use cfg_gen::{Grammar, Sampler};

fn main() -> cfg_gen::Result<()> {
    let source = "\
<Expr> := <Term> | <Term>+<Expr> | <Term>-<Expr>
<Term> := <Factor> | <Factor>*<Term>
<Factor> := (<Expr>) | <Number>
<Number> := 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9";

    let mut grammar = Grammar::parse(source)?;
    let analysis = grammar.analyze();
    println!(
        "minimum required depth: {:?}, unreachable: {:?}",
        analysis.min_required_depth, analysis.unreachable
    );

    let mut sampler = Sampler::with_seed(grammar, "Expr", Some(10), 2024)?;
    for i in 1..=10 {
        match sampler.draw() {
            Ok(expr) => println!("{:2}. {}", i, expr),
            Err(err) => println!("{:2}. (budget too small: {})", i, err),
        }
    }

    Ok(())
}
