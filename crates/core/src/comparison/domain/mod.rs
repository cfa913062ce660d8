pub mod face_comparer;
