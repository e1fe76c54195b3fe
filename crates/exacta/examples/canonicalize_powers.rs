//! Walking the Power/Root canonicalizer and the exact numeric tower.
//!
//! Run with: cargo run --example canonicalize_powers

use exacta::prelude::*;

fn show(arena: &ExprArena, label: &str, handle: ExprHandle) {
    match arena.numeric_value(handle) {
        Some(value) => println!("  {label} = {value}"),
        None => println!("  {label} stays symbolic: {:?}", arena.get(handle)),
    }
}

fn main() {
    println!("=== Exact numeric values ===");
    let sqrt75 = NumericValue::integer(75).sqrt();
    println!("  √75 = {sqrt75}");

    let sum = NumericValue::sum(&[
        NumericValue::exact(1, 1, 2),
        NumericValue::exact(1, 1, 2),
        NumericValue::rational(1, 4),
    ]);
    let rendered: Vec<String> = sum.iter().map(ToString::to_string).collect();
    println!("  √2 + √2 + 1/4 = {}", rendered.join(" + "));

    let small = NumericValue::integer(2).powi(10);
    let big = NumericValue::integer(2).powi(10_000);
    println!("  2^10 = {small}");
    println!("  2^10000 has {} digits", big.to_string().len());

    println!();
    println!("=== Power canonicalization ===");
    let mut arena = ExprArena::new();

    let x = arena.symbol("x");
    let two = arena.integer(2);
    let three = arena.integer(3);

    let nested = arena.pow(x, two);
    let folded = canonical_power(&mut arena, nested, three);
    show(&arena, "(x^2)^3", folded);

    let zero = arena.integer(0);
    let x_pow_zero = canonical_power(&mut arena, x, zero);
    show(&arena, "x^0", x_pow_zero);

    let zero_base = arena.integer(0);
    let h = canonical_power(&mut arena, zero_base, zero);
    show(&arena, "0^0", h);

    let seventy_five = arena.integer(75);
    let h = canonical_root(&mut arena, seventy_five, 2);
    show(&arena, "√75", h);

    println!();
    println!("=== Euler's formula ===");
    let e = arena.constant(Constant::E);
    let i = arena.number(NumericValue::exact_gaussian(0, 1));
    let pi = arena.constant(Constant::Pi);
    let i_pi = arena.mul([i, pi]);
    let exact = pow(&mut arena, e, i_pi, EvalMode::Exact);
    show(&arena, "e^(i·π), exact mode", exact);
    let approx = pow(&mut arena, e, i_pi, EvalMode::Approximate);
    show(&arena, "e^(i·π), approximate mode", approx);
}
