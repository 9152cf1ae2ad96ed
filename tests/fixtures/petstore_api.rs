//! Handlers of a small pet store service.

use axum::extract::{Path, Query};
use axum::Json;

use crate::models::{NewPet, Pet, PetPage};

/* go-swagify
@@openapi: 3.0.3
title: Pet Store
version: 1.2.0
description: Pets for sale
contact.name: Store Team
contact.email: store@example.com
license.name: Apache-2.0
license.url: https://www.apache.org/licenses/LICENSE-2.0
*/

/* go-swagify
@@server: production
url: https://{region}.petstore.example.com/v1
description: Production
variables.region.default: eu
variables.region.enum: eu;us
*/

/* go-swagify
@@server: uploads
url: https://uploads.petstore.example.com
scope: /pets/{petId}/photo
*/

/* go-swagify
@@server: sandbox
url: https://sandbox.petstore.example.com
scope: none
*/

/* go-swagify
@@parameter: petId
name: petId
in: path
description: Identifier of the pet
schema.type: integer
schema.format: int64
*/

/* go-swagify
@@parameter: limit
in: query
description: Page size
schema.type: integer
*/

/* go-swagify
@@requestBody: NewPet
description: Pet to add
required: true
schema.ref: NewPet
*/

/* go-swagify
@@response: PetFound
description: A single pet
schema.ref: Pet
*/

/* go-swagify
@@response: PetList
description: A page of pets
schema.ref: PetPage
*/

/* go-swagify
@@response: NotFound
description: No such pet
*/

/* go-swagify
@@path: /pets
summary: Pet collection
*/

/* go-swagify
@@operation: /pets
get.summary: List pets
get.operationId: listPets
get.tags: pets
get.parameters.ref: limit
get.responses.ref: 200:PetList
post.summary: Add a pet
post.operationId: addPet
post.tags: pets
post.requestBody.ref: NewPet
post.responses.ref: 201:PetFound
post.server.ref: sandbox
*/
pub async fn list_pets(Query(limit): Query<u32>) -> Json<PetPage> {
    todo!()
}

pub async fn add_pet(Json(pet): Json<NewPet>) -> Json<Pet> {
    todo!()
}

/* go-swagify
 * @@path: /pets/{petId}
 * summary: A single pet
 * parameters.ref: petId
 */

/* go-swagify
 * @@operation: /pets/{petId}
 * get.summary: Fetch a pet
 * get.operationId: getPet
 * get.responses.ref: 200:PetFound;404:NotFound
 * delete.summary: Remove a pet
 * delete.deprecated: true
 * delete.responses.ref: NotFound
 */
pub async fn get_pet(Path(pet_id): Path<u64>) -> Json<Pet> {
    todo!()
}

/* go-swagify
@@path: /pets/{petId}/photo
description: Pet photo upload
parameters.ref: petId
*/

/* go-swagify
@@operation: /pets/{petId}/photo
method: put
*/
