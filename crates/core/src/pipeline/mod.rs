pub mod compare_faces_use_case;
pub mod extract_faces_use_case;
