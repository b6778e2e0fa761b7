//! Name and email generators.

use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use rand::Rng;

const FIRST_NAMES: [&str; 20] = [
    "Liam", "Olivia", "Noah", "Emma", "Oliver", "Ava", "William", "Sophia", "Elijah", "Isabella",
    "James", "Charlotte", "Benjamin", "Amelia", "Lucas", "Mia", "Mason", "Harper", "Ethan",
    "Evelyn",
];

const LAST_NAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin",
];

const DESCRIPTORS: [&str; 20] = [
    "Adaptable", "Ambitious", "Brave", "Calm", "Cheerful", "Classic", "Cultured", "Delightful",
    "Delicate", "Familiar", "Fearless", "Gentle", "Harmonious", "Joyous", "Lovely", "Lucky",
    "Noble", "Original", "Timeless", "Wise",
];

const PRODUCTS: [&str; 15] = [
    "Fedora", "Boater", "Snapback", "Trilby", "Panama", "Bowler", "Dad", "Newsboy", "Flat Cap",
    "Beanie", "Bucket", "Baseball", "Trapper", "Pork Pie", "Top Hat",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.random_range(0..values.len())]
}

/// Item name such as "The Brave Fedora".
pub fn generate_item_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let descriptor = pick(rng, &DESCRIPTORS);
    let product = pick(rng, &PRODUCTS);
    format!("The {descriptor} {product}")
}

/// Full name such as "Emma Garcia".
pub fn generate_user_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = pick(rng, &FIRST_NAMES);
    let last = pick(rng, &LAST_NAMES);
    format!("{first} {last}")
}

/// Plausible email address on a reserved example domain.
pub fn generate_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    SafeEmail().fake_with_rng(rng)
}
