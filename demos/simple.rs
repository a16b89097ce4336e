use memdex::{SkipList, SkipListOptions};

fn main() {
    println!("memdex Simple Example");

    let list = SkipList::new(SkipListOptions::default()).expect("Failed to build index");

    list.insert("name", "Alice");
    list.insert("age", "30");

    if let Some(name) = list.get("name") {
        println!("Name: {}", name.payload().expect("live entry"));
    }

    if let Some(age) = list.get("age") {
        println!("Age: {}", age.payload().expect("live entry"));
    }

    list.update("name", "Bob").expect("Failed to update");

    if let Some(name) = list.get("name") {
        println!("Updated Name: {}", name.payload().expect("live entry"));
    }

    list.delete("age").expect("Failed to delete");

    match list.get("age") {
        Some(age) => println!("Age: {}", age.payload().expect("live entry")),
        None => println!("Age has been deleted"),
    }

    println!("Live entries: {}", list.len());
    for (key, entry) in list.materialize() {
        println!("  {key} -> {}", entry.payload().expect("live entry"));
    }
}
