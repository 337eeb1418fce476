//! Demo catalog contents.

use catalog::{Catalog, CatalogResult};
use entities::{Material, User};

/// Builds the demo catalog: four books, four DVDs, four magazines and four
/// users.
pub fn demo_catalog(name: &str, loan_limit_days: u32) -> CatalogResult<Catalog> {
    let mut catalog = Catalog::new(name).with_loan_limit_days(loan_limit_days);

    let materials = [
        Material::book(1, "El Quijote", "Miguel de Cervantes", 1605, 863)?,
        Material::book(2, "Cien Años de Soledad", "Gabriel García Márquez", 1967, 417)?,
        Material::book(3, "1984", "George Orwell", 1949, 328)?,
        Material::book(4, "Moby Dick", "Herman Melville", 1851, 635)?,
        Material::dvd(5, "Inception", "Christopher Nolan", 2010, 148)?,
        Material::dvd(6, "Interstellar", "Christopher Nolan", 2014, 169)?,
        Material::dvd(7, "The Matrix", "The Wachowskis", 1999, 136)?,
        Material::dvd(8, "Parasite", "Bong Joon-ho", 2019, 132)?,
        Material::magazine(9, "National Geographic", "Various", 2023, 200)?,
        Material::magazine(10, "Time", "Various", 2023, 125)?,
        Material::magazine(11, "Scientific American", "Various", 2023, 150)?,
        Material::magazine(12, "The Economist", "Various", 2023, 120)?,
    ];
    for material in materials {
        catalog.add_material(material)?;
    }

    for (name, email) in [
        ("Alice", "alice@example.com"),
        ("Bob", "bob@example.com"),
        ("Carlos", "carlos@example.com"),
        ("Diana", "diana@example.com"),
    ] {
        catalog.add_user(User::new(name, email)?);
    }

    Ok(catalog)
}
