pub mod http_face_comparer;
