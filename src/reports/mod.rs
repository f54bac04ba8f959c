use adfgvx::analysis::{Decryption, SelfTestSummary, SubstitutionReport};
use adfgvx::cipher::PolybiusSquare;
use adfgvx::consts::{CIPHER_ALPHABET, CIPHER_SYMBOLS, PLAIN_ALPHABET};
use adfgvx::optimizer::Strategy;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn pct(part: usize, whole: usize) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 * 100.0 / whole as f64)
    }
}

pub fn print_square(square: &PolybiusSquare) {
    println!("\nPolybius square:");
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let mut header = vec![Cell::new("")];
    header.extend(
        CIPHER_ALPHABET
            .iter()
            .map(|&c| Cell::new(c as char).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (r, &label) in CIPHER_ALPHABET.iter().enumerate() {
        let mut row = vec![Cell::new(label as char).add_attribute(Attribute::Bold)];
        for c in 0..CIPHER_SYMBOLS {
            let sym = square.lookup(r as u8, c as u8);
            row.push(
                Cell::new(PLAIN_ALPHABET[sym as usize] as char)
                    .set_alignment(CellAlignment::Center),
            );
        }
        table.add_row(row);
    }
    println!("{}", table);
}

pub fn print_decryption(d: &Decryption) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Key length").add_attribute(Attribute::Bold),
        Cell::new(d.key_length),
    ]);
    table.add_row(vec![
        Cell::new("Coordinate groups").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{:?} | {:?} (mismatch {})",
            d.partition.first, d.partition.second, d.partition.mismatch
        )),
    ]);
    table.add_row(vec![
        Cell::new("Column pairs").add_attribute(Attribute::Bold),
        Cell::new(format!("{:?}", d.pairs)),
    ]);
    table.add_row(vec![
        Cell::new("Pairing / order score").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{:.1} / {:.1}",
            d.pattern.pairing_score, d.pattern.order_score
        )),
    ]);
    table.add_row(vec![
        Cell::new("Index of coincidence").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.3}", d.index_of_coincidence)),
    ]);
    table.add_row(vec![
        Cell::new("Fitness").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", d.fitness)).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Evaluations").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} ({} refinement rounds)",
            d.evaluations, d.refinement_rounds
        )),
    ]);
    table.add_row(vec![
        Cell::new("Alphabet").add_attribute(Attribute::Bold),
        Cell::new(format!("{}\n{}", String::from_utf8_lossy(PLAIN_ALPHABET), d.alphabet)),
    ]);

    println!("\n=== 🏆 RECOVERED ===");
    println!("{}", table);
    println!("Plaintext: {}", d.plaintext);
}

pub fn print_self_test_report(s: &SelfTestSummary) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Seed").add_attribute(Attribute::Bold),
        Cell::new("Key"),
        Cell::new("Grouping"),
        Cell::new("Pairing"),
        Cell::new("Order"),
        Cell::new("Accuracy").fg(Color::Cyan),
    ]);
    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let mark = |v: Option<bool>| match v {
        Some(true) => Cell::new("ok").fg(Color::Green),
        Some(false) => Cell::new("miss").fg(Color::Red),
        None => Cell::new("-"),
    };

    for r in &s.reports {
        table.add_row(vec![
            Cell::new(r.seed),
            Cell::new(format!("{:?}", r.key)),
            mark(Some(r.grouping_correct)),
            mark(r.pairing_correct),
            mark(r.order_correct),
            Cell::new(r.accuracy.map_or("-".to_string(), |a| format!("{:.1}%", a * 100.0))),
        ]);
    }
    println!("\n{}", table);

    println!(
        "\n=== 🧪 SELF-TEST ({} trials, level {}, key length {}) ===",
        s.trials, s.level, s.key_length
    );
    println!("Grouping : {:>4} {}", s.grouping_correct, pct(s.grouping_correct, s.trials));
    println!("Pairing  : {:>4} {}", s.pairing_correct, pct(s.pairing_correct, s.trials));
    println!("Order    : {:>4} {}", s.order_correct, pct(s.order_correct, s.trials));
    println!("Recovered: {:>4} {}", s.recovered, pct(s.recovered, s.trials));
    if let Some(acc) = s.mean_accuracy {
        println!("Mean accuracy of full runs: {:.1}%", acc * 100.0);
    }
}

pub fn print_substitution_report(strategy: Strategy, reports: &[SubstitutionReport]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Seed").add_attribute(Attribute::Bold),
        Cell::new("Correct"),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("True fitness"),
    ]);

    let mut correct = 0;
    let mut present = 0;
    for r in reports {
        correct += r.correct_mappings;
        present += r.present_symbols;
        let found = Cell::new(format!("{:.4}", r.fitness));
        table.add_row(vec![
            Cell::new(r.seed),
            Cell::new(format!("{}/{}", r.correct_mappings, r.present_symbols)),
            if r.fitness + 1e-9 >= r.true_fitness {
                found.fg(Color::Green)
            } else {
                found
            },
            Cell::new(format!("{:.4}", r.true_fitness)),
        ]);
    }
    println!("\n=== 🔁 {} ===", strategy);
    println!("{}", table);
    println!("Mappings recovered: {}/{} ({})", correct, present, pct(correct, present));
}
