use anyhow::Result;

use super::{heading, InputArgs};

/// List the catalog runs with their times and HV slots
pub fn run(input: InputArgs) -> Result<()> {
    let inputs = input.load()?;
    let catalog = &inputs.catalog;

    println!("{}", heading(&format!("{} runs", catalog.len())));
    for entry in catalog.iter() {
        println!();
        print!("  {}  {} - {}", entry.run, entry.begin, entry.end);
        if let Some(nevents) = &entry.nevents {
            print!("  ({} events)", nevents);
        }
        println!();

        for slot in &entry.slots {
            match &slot.bias {
                Some(bias) => println!(
                    "    {:<5} {:<12} {}  bias {}",
                    slot.key, slot.descriptor, slot.diode, bias
                ),
                None => println!("    {:<5} {:<12} {}", slot.key, slot.descriptor, slot.diode),
            }
        }
    }

    Ok(())
}
