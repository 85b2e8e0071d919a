pub mod a001_amenity_template;
