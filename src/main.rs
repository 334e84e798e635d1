use RustedSums::Examples::expansion_examples::expansion_examples;

fn main() {
    let example = 3;
    expansion_examples(example);
}
