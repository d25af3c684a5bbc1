//! Random `UserFormData` for demos and seeding test backends.

use rand::Rng;

use crate::types::UserFormData;

pub const NAMES: [&str; 10] = [
    "Alex Johnson",
    "Taylor Smith",
    "Jordan Brown",
    "Casey Williams",
    "Morgan Davis",
    "Avery Chen",
    "Riley Patel",
    "Sam Rodriguez",
    "Quinn O'Connor",
    "Jamie Kim",
];

pub const BIOGRAPHIES: [&str; 5] = [
    "A passionate software developer with expertise in full-stack development.",
    "Creative UI/UX designer focused on creating intuitive user experiences.",
    "Data scientist specializing in machine learning and analytics.",
    "DevOps engineer with experience in cloud infrastructure and automation.",
    "Product manager with a background in agile development methodologies.",
];

/// Pick a name and a biography independently, using the thread-local RNG.
pub fn generate() -> UserFormData {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> UserFormData {
    let name = NAMES[rng.gen_range(0..NAMES.len())];
    let biography = BIOGRAPHIES[rng.gen_range(0..BIOGRAPHIES.len())];
    UserFormData {
        name: name.to_string(),
        biography: biography.to_string(),
    }
}
