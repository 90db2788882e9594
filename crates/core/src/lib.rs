//! Face verification over video: decide whether the face in a reference
//! photo shows up often enough in a submitted clip.
//!
//! Layout follows a domain/infrastructure split per concern. Domain modules
//! define the traits and value types the verification use case works with;
//! infrastructure modules implement them on top of FFmpeg and ONNX Runtime.

pub mod detection {
    pub mod domain {
        pub mod face_box;
        pub mod face_detector;
        pub mod face_landmarks;
    }
    pub mod infrastructure;
}

pub mod encoding {
    pub mod domain {
        pub mod face_comparator;
        pub mod face_embedder;
        pub mod face_encoder;
        pub mod face_encoding;
    }
    pub mod infrastructure {
        pub mod arcface_embedder;
        pub mod cosine_comparator;
        pub mod detecting_face_encoder;
        pub mod face_aligner;
    }
}

pub mod video {
    pub mod domain {
        pub mod video_reader;
    }
    pub mod infrastructure {
        pub mod ffmpeg_reader;
        pub mod image_file_reader;
    }
}

pub mod verification {
    pub mod domain {
        pub mod frame_sampler;
        pub mod match_tally;
        pub mod verification_error;
        pub mod verification_policy;
    }
    pub mod infrastructure {
        pub mod temp_media;
    }
    pub mod verify_face_use_case;
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod video_metadata;
}
